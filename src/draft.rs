// The card being built for one word. A draft lives for a single pass of the
// session loop: it is filled from the lookup, edited by the user and then
// submitted, skipped or abandoned.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::lookup::Lookup;

/// A local file that will be embedded into the note as media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    /// Name the file gets in the flashcard application's media folder.
    pub filename: String,
    /// True when this program downloaded the file and may delete it.
    pub downloaded: bool,
}

impl MediaFile {
    /// Remove the file if we created it. User-supplied files are left alone.
    pub fn cleanup(&self) {
        if !self.downloaded {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "could not remove media file");
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardDraft {
    word: String,
    pub translation: String,
    pub ipa: String,
    pub pos: String,
    pub examples: String,
    pub notes: String,
    pub picture: Option<MediaFile>,
    pub audio: Option<MediaFile>,
}

impl CardDraft {
    /// Start a draft for `word`. Returns `None` for a blank word, so a draft
    /// always carries one.
    pub fn new(word: &str) -> Option<Self> {
        let word = word.trim();
        if word.is_empty() {
            return None;
        }
        Some(Self {
            word: word.to_string(),
            ..Self::default()
        })
    }

    /// Pre-fill the editable fields from a lookup result.
    pub fn fill_from(&mut self, lookup: Lookup) {
        self.examples = lookup.examples_field();
        self.translation = lookup.translation;
        self.ipa = lookup.ipa;
        self.pos = lookup.pos;
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// Delete any media downloaded for this draft.
    pub fn discard_media(&self) {
        for media in self.audio.iter().chain(self.picture.iter()) {
            media.cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_word_has_no_draft() {
        assert!(CardDraft::new("").is_none());
        assert!(CardDraft::new("   ").is_none());
        assert_eq!(CardDraft::new("  gist ").unwrap().word(), "gist");
    }

    #[test]
    fn fill_from_copies_the_lookup() {
        let mut draft = CardDraft::new("ephemeral").unwrap();
        draft.fill_from(Lookup {
            translation: "lasting for a very short time".into(),
            ipa: "/əˈfem(ə)rəl/".into(),
            pos: "adjective".into(),
            definitions: vec!["lasting for a very short time".into()],
            examples: vec!["fashions are ephemeral".into(), "ephemeral pleasures".into()],
        });

        assert_eq!(draft.word(), "ephemeral");
        assert_eq!(draft.translation, "lasting for a very short time");
        assert_eq!(draft.ipa, "/əˈfem(ə)rəl/");
        assert_eq!(draft.pos, "adjective");
        assert_eq!(
            draft.examples,
            "• fashions are ephemeral<br>• ephemeral pleasures"
        );
    }

    #[test]
    fn cleanup_only_removes_downloaded_files() {
        let dir = tempfile::tempdir().unwrap();
        let ours = dir.path().join("a.mp3");
        let theirs = dir.path().join("b.png");
        fs::write(&ours, b"x").unwrap();
        fs::write(&theirs, b"y").unwrap();

        let mut draft = CardDraft::new("word").unwrap();
        draft.audio = Some(MediaFile {
            path: ours.clone(),
            filename: "a.mp3".into(),
            downloaded: true,
        });
        draft.picture = Some(MediaFile {
            path: theirs.clone(),
            filename: "b.png".into(),
            downloaded: false,
        });
        draft.discard_media();

        assert!(!ours.exists());
        assert!(theirs.exists());
    }
}
