// Session configuration. Everything the card cycle needs to know about its
// surroundings (endpoints, note type, working directory) lives in one value
// that is handed explicitly to the session loop.

use std::env;
use std::path::PathBuf;

/// Default AnkiConnect endpoint.
pub const ANKI_CONNECT_URL: &str = "http://localhost:8765";
/// Google Translate text-to-speech endpoint, the same one `trans -speak` uses.
pub const AUDIO_URL: &str = "https://translate.google.com/translate_tts";

/// Names of the note-type fields the card is written into.
#[derive(Debug, Clone)]
pub struct FieldNames {
    pub note_id: String,
    pub word: String,
    pub translation: String,
    pub ipa: String,
    pub pos: String,
    pub examples: String,
    pub notes: String,
    pub audio: String,
    pub picture: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            note_id: "Note ID".into(),
            word: "Word".into(),
            translation: "Translation".into(),
            ipa: "IPA transcription".into(),
            pos: "PoS".into(),
            examples: "Example sentence(s)".into(),
            notes: "Notes".into(),
            audio: "Pronunciation sound".into(),
            picture: "Picture".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub anki_url: String,
    /// Note type (Anki "model") new cards are created with.
    pub note_type: String,
    pub fields: FieldNames,
    pub tags: Vec<String>,
    /// Deck used when the deck list is empty or the user keeps the default.
    pub default_deck: String,
    /// Where downloaded audio and pictures are written.
    pub work_dir: PathBuf,
    pub trans_bin: String,
    /// Browser command; `None` means the OS default browser.
    pub browser: Option<String>,
    pub audio_url: String,
    /// Source and target language for the lookup and the audio.
    pub language: String,
    pub quit_sentinel: String,
}

impl Default for Config {
    fn default() -> Self {
        let work_dir = dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join("vocab-card");
        Self {
            anki_url: ANKI_CONNECT_URL.into(),
            note_type: "FF basic vocabulary".into(),
            fields: FieldNames::default(),
            tags: vec!["script_added".into()],
            default_deck: "Default".into(),
            work_dir,
            trans_bin: "trans".into(),
            browser: None,
            audio_url: AUDIO_URL.into(),
            language: "en".into(),
            quit_sentinel: "q".into(),
        }
    }
}

impl Config {
    /// Build a configuration from the defaults, overridden by any of
    /// `ANKI_CONNECT_URL`, `VOCAB_NOTE_TYPE`, `VOCAB_DECK_DEFAULT`,
    /// `VOCAB_WORK_DIR`, `VOCAB_TRANS_BIN`, `VOCAB_BROWSER`,
    /// `VOCAB_AUDIO_URL` and `VOCAB_LANG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        // Blank variables are treated as unset.
        let get = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("ANKI_CONNECT_URL") {
            config.anki_url = url;
        }
        if let Some(note_type) = get("VOCAB_NOTE_TYPE") {
            config.note_type = note_type;
        }
        if let Some(deck) = get("VOCAB_DECK_DEFAULT") {
            config.default_deck = deck;
        }
        if let Some(dir) = get("VOCAB_WORK_DIR") {
            config.work_dir = PathBuf::from(dir);
        }
        if let Some(bin) = get("VOCAB_TRANS_BIN") {
            config.trans_bin = bin;
        }
        config.browser = get("VOCAB_BROWSER");
        if let Some(url) = get("VOCAB_AUDIO_URL") {
            config.audio_url = url;
        }
        if let Some(lang) = get("VOCAB_LANG") {
            config.language = lang;
        }
        config
    }
}
