// API client module: a small blocking client for AnkiConnect, the HTTP API
// exposed by the Anki desktop application, plus the code that turns a card
// draft into an `addNote` request.

use std::collections::BTreeMap;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::draft::{CardDraft, MediaFile};
use crate::error::SubmitError;

/// AnkiConnect protocol version this client speaks.
const API_VERSION: u32 = 6;

/// Blocking AnkiConnect client. Every call is a POST of
/// `{action, version, params}` to the same URL.
#[derive(Clone)]
pub struct AnkiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnkiRequest<'a> {
    action: &'a str,
    version: u32,
    params: Value,
}

#[derive(Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

/// Payload of an `addNote` call.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: BTreeMap<String, String>,
    pub options: NoteOptions,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub audio: Vec<MediaAttachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub picture: Vec<MediaAttachment>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    pub allow_duplicate: bool,
    pub duplicate_scope: String,
}

impl Default for NoteOptions {
    fn default() -> Self {
        Self {
            allow_duplicate: false,
            duplicate_scope: "deck".into(),
        }
    }
}

/// Media embedded in the note. AnkiConnect stores `data` under `filename`
/// and appends a reference to it to each of `fields`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MediaAttachment {
    pub filename: String,
    pub data: String,
    pub fields: Vec<String>,
}

impl AnkiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Protocol version reported by AnkiConnect. Used as a reachability check.
    pub fn version(&self) -> Result<u32, SubmitError> {
        self.invoke("version", json!({}))
    }

    pub fn deck_names(&self) -> Result<Vec<String>, SubmitError> {
        self.invoke("deckNames", json!({}))
    }

    /// Names of the note types ("models") in the collection.
    pub fn model_names(&self) -> Result<Vec<String>, SubmitError> {
        self.invoke("modelNames", json!({}))
    }

    pub fn model_field_names(&self, model: &str) -> Result<Vec<String>, SubmitError> {
        self.invoke("modelFieldNames", json!({ "modelName": model }))
    }

    /// Create a note and return its id.
    pub fn add_note(&self, note: &NewNote) -> Result<u64, SubmitError> {
        self.invoke("addNote", json!({ "note": note }))
    }

    fn invoke<T: DeserializeOwned>(&self, action: &str, params: Value) -> Result<T, SubmitError> {
        debug!(action, "AnkiConnect request");
        let request = AnkiRequest {
            action,
            version: API_VERSION,
            params,
        };
        let res = self.client.post(&self.base_url).json(&request).send()?;
        if !res.status().is_success() {
            return Err(SubmitError::Status(res.status()));
        }

        let body: AnkiResponse<T> = res.json()?;
        if let Some(error) = body.error {
            return Err(SubmitError::from_api(error));
        }
        body.result
            .ok_or_else(|| SubmitError::EmptyResult(action.to_string()))
    }
}

/// Build the `addNote` payload for `draft`.
///
/// When `model_fields` is known, fields the note type does not have are left
/// out and every other field of the note type is sent empty, so AnkiConnect
/// neither rejects the note nor leaves fields unset.
pub fn build_note(
    draft: &CardDraft,
    deck: &str,
    config: &Config,
    model_fields: Option<&[String]>,
) -> Result<NewNote, SubmitError> {
    if draft.word().trim().is_empty() {
        return Err(SubmitError::EmptyWord);
    }
    let names = &config.fields;

    let mut fields = BTreeMap::new();
    fields.insert(names.note_id.clone(), note_id());
    fields.insert(names.word.clone(), draft.word().to_string());
    fields.insert(names.translation.clone(), draft.translation.clone());
    fields.insert(names.ipa.clone(), draft.ipa.clone());
    fields.insert(names.pos.clone(), draft.pos.clone());
    fields.insert(names.examples.clone(), draft.examples.clone());
    fields.insert(names.notes.clone(), draft.notes.clone());

    if let Some(known) = model_fields {
        fields.retain(|name, _| known.contains(name));
        for name in known {
            fields.entry(name.clone()).or_default();
        }
    }

    let audio = draft
        .audio
        .as_ref()
        .map(|media| attachment(media, &names.audio))
        .transpose()?;
    let picture = draft
        .picture
        .as_ref()
        .map(|media| attachment(media, &names.picture))
        .transpose()?;

    Ok(NewNote {
        deck_name: deck.to_string(),
        model_name: config.note_type.clone(),
        fields,
        options: NoteOptions::default(),
        tags: config.tags.clone(),
        audio: audio.into_iter().collect(),
        picture: picture.into_iter().collect(),
    })
}

fn attachment(media: &MediaFile, field: &str) -> Result<MediaAttachment, SubmitError> {
    let bytes = fs::read(&media.path).map_err(|source| SubmitError::Media {
        path: media.path.clone(),
        source,
    })?;
    Ok(MediaAttachment {
        filename: media.filename.clone(),
        data: STANDARD.encode(bytes),
        fields: vec![field.to_string()],
    })
}

/// Millisecond timestamp used to fill the note type's id field.
fn note_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn draft() -> CardDraft {
        let mut draft = CardDraft::new("ephemeral").unwrap();
        draft.translation = "lasting for a very short time".into();
        draft.ipa = "/ɪˈfɛm(ə)rəl/".into();
        draft.pos = "adjective".into();
        draft.notes = "from a novel".into();
        draft
    }

    #[test]
    fn note_carries_every_draft_field() {
        let config = Config::default();
        let note = build_note(&draft(), "English", &config, None).unwrap();

        assert_eq!(note.deck_name, "English");
        assert_eq!(note.model_name, "FF basic vocabulary");
        assert_eq!(note.fields["Word"], "ephemeral");
        assert_eq!(note.fields["Translation"], "lasting for a very short time");
        assert_eq!(note.fields["IPA transcription"], "/ɪˈfɛm(ə)rəl/");
        assert_eq!(note.fields["PoS"], "adjective");
        assert_eq!(note.fields["Example sentence(s)"], "");
        assert_eq!(note.fields["Notes"], "from a novel");
        assert!(note.fields["Note ID"].parse::<u128>().is_ok());
        assert!(note.audio.is_empty() && note.picture.is_empty());

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["options"]["allowDuplicate"], false);
        assert_eq!(json["options"]["duplicateScope"], "deck");
        assert!(json.get("audio").is_none());
    }

    #[test]
    fn fields_follow_the_note_type() {
        let config = Config::default();
        let known: Vec<String> = ["Word", "Translation", "Article", "Picture"]
            .into_iter()
            .map(String::from)
            .collect();
        let note = build_note(&draft(), "English", &config, Some(&known)).unwrap();

        let names: Vec<&str> = note.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Article", "Picture", "Translation", "Word"]);
        assert_eq!(note.fields["Article"], "");
    }

    #[test]
    fn media_is_embedded_as_base64() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anki_audio_ephemeral.mp3");
        fs::write(&path, b"ID3").unwrap();

        let mut draft = draft();
        draft.audio = Some(MediaFile {
            path,
            filename: "anki_audio_ephemeral.mp3".into(),
            downloaded: true,
        });
        let note = build_note(&draft, "English", &Config::default(), None).unwrap();

        assert_eq!(
            note.audio,
            vec![MediaAttachment {
                filename: "anki_audio_ephemeral.mp3".into(),
                data: "SUQz".into(),
                fields: vec!["Pronunciation sound".into()],
            }]
        );
    }

    #[test]
    fn unreadable_media_fails_the_submit() {
        let mut draft = draft();
        draft.picture = Some(MediaFile {
            path: PathBuf::from("/no/such/picture.png"),
            filename: "anki_img_ephemeral.png".into(),
            downloaded: false,
        });
        let err = build_note(&draft, "English", &Config::default(), None).unwrap_err();
        assert!(matches!(err, SubmitError::Media { .. }));
    }
}
