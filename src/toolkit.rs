// The side-effecting operations a card cycle needs (subprocess, network,
// browser, AnkiConnect), grouped behind one trait so the session loop can be
// run against a fake in tests. `Live` is the real thing.

use reqwest::blocking::Client;
use tracing::debug;

use crate::api::{self, AnkiClient};
use crate::audio;
use crate::browser;
use crate::config::Config;
use crate::draft::{CardDraft, MediaFile};
use crate::error::{FetchError, LaunchError, LookupError, PictureError, SubmitError};
use crate::lookup::{self, Lookup};
use crate::picture;
use crate::ui;

pub trait Toolkit {
    /// Check that the flashcard application answers at all.
    fn connect(&mut self, config: &Config) -> Result<(), SubmitError>;

    /// Field names of the configured note type.
    fn note_fields(&mut self, config: &Config) -> Result<Vec<String>, SubmitError>;

    fn deck_names(&mut self) -> Result<Vec<String>, SubmitError>;

    fn lookup(&mut self, config: &Config, word: &str) -> Result<Lookup, LookupError>;

    fn fetch_audio(&mut self, config: &Config, word: &str) -> Result<MediaFile, FetchError>;

    fn open_references(&mut self, config: &Config, word: &str) -> Result<(), LaunchError>;

    fn resolve_picture(
        &mut self,
        config: &Config,
        word: &str,
        answer: &str,
    ) -> Result<Option<MediaFile>, PictureError>;

    /// Create the note and return its id.
    fn submit(&mut self, config: &Config, draft: &CardDraft, deck: &str)
        -> Result<u64, SubmitError>;
}

/// Toolkit backed by the real tools and services.
pub struct Live {
    http: Client,
    anki: AnkiClient,
    /// Field names of the note type, once known.
    model_fields: Option<Vec<String>>,
}

impl Live {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = Client::builder().build()?;
        // AnkiConnect runs on this machine; never send it through a proxy.
        let local = Client::builder().no_proxy().build()?;
        let anki = AnkiClient::new(local, &config.anki_url);
        Ok(Self {
            http,
            anki,
            model_fields: None,
        })
    }
}

impl Toolkit for Live {
    fn connect(&mut self, _config: &Config) -> Result<(), SubmitError> {
        let version = self.anki.version()?;
        debug!(version, "connected to AnkiConnect");
        Ok(())
    }

    fn note_fields(&mut self, config: &Config) -> Result<Vec<String>, SubmitError> {
        let models = self.anki.model_names()?;
        if !models.contains(&config.note_type) {
            return Err(SubmitError::Api(format!(
                "note type `{}` not found",
                config.note_type
            )));
        }
        let fields = self.anki.model_field_names(&config.note_type)?;
        self.model_fields = Some(fields.clone());
        Ok(fields)
    }

    fn deck_names(&mut self) -> Result<Vec<String>, SubmitError> {
        self.anki.deck_names()
    }

    fn lookup(&mut self, config: &Config, word: &str) -> Result<Lookup, LookupError> {
        let spinner = ui::spinner("Looking up definition...");
        let res = lookup::lookup_word(config, word);
        spinner.finish_and_clear();
        res
    }

    fn fetch_audio(&mut self, config: &Config, word: &str) -> Result<MediaFile, FetchError> {
        let spinner = ui::spinner("Downloading pronunciation...");
        let res = audio::fetch_audio(&self.http, config, word);
        spinner.finish_and_clear();
        res
    }

    fn open_references(&mut self, config: &Config, word: &str) -> Result<(), LaunchError> {
        browser::open_references(word, config.browser.as_deref())
    }

    fn resolve_picture(
        &mut self,
        config: &Config,
        word: &str,
        answer: &str,
    ) -> Result<Option<MediaFile>, PictureError> {
        picture::resolve(&self.http, config, word, answer)
    }

    fn submit(
        &mut self,
        config: &Config,
        draft: &CardDraft,
        deck: &str,
    ) -> Result<u64, SubmitError> {
        let note = api::build_note(draft, deck, config, self.model_fields.as_deref())?;
        self.anki.add_note(&note)
    }
}
