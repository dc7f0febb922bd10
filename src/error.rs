// Error taxonomy. Every step of a card cycle has its own error type so the
// session loop can report the condition and degrade just that step; only
// `Error::UserAbort` ends the session.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// The external lookup tool could not produce output for a word.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup tool `{0}` is not installed or not on PATH")]
    NotInstalled(String),

    #[error("lookup tool exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("failed to run lookup tool: {0}")]
    Io(#[from] io::Error),
}

/// Downloading a remote resource (pronunciation audio or a picture) failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid download URL: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("server returned an empty body")]
    Empty,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The picture answer could not be turned into a usable image file.
#[derive(Debug, Error)]
pub enum PictureError {
    #[error("not a valid URL: {0}")]
    InvalidUrl(String),

    #[error("image file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("image download failed: {0}")]
    Download(#[from] FetchError),
}

/// The browser could not be started for the reference pages.
#[derive(Debug, Error)]
#[error("could not open {target}: {source}")]
pub struct LaunchError {
    pub target: String,
    #[source]
    pub source: io::Error,
}

/// The flashcard application rejected the note or could not be reached.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("refusing to submit a card without a word")]
    EmptyWord,

    #[error("AnkiConnect is unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("AnkiConnect answered {0}")]
    Status(StatusCode),

    #[error("note is a duplicate: {0}")]
    Duplicate(String),

    #[error("AnkiConnect error: {0}")]
    Api(String),

    #[error("AnkiConnect returned no result for `{0}`")]
    EmptyResult(String),

    #[error("failed to read media file {path}: {source}")]
    Media {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SubmitError {
    /// Classify an error string reported by AnkiConnect.
    pub fn from_api(message: String) -> Self {
        if message.contains("duplicate") {
            SubmitError::Duplicate(message)
        } else {
            SubmitError::Api(message)
        }
    }
}

/// Session-level outcome of anything that is not recovered locally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("session ended by user")]
    UserAbort,

    #[error("terminal input failed: {0}")]
    Prompt(#[source] io::Error),

    #[error(transparent)]
    Startup(#[from] SubmitError),
}

impl From<io::Error> for Error {
    /// End of input and interrupts at a prompt count as the user leaving.
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted => Error::UserAbort,
            _ => Error::Prompt(err),
        }
    }
}
