// Small blocking download helpers shared by the audio fetcher and the picture
// resolver.

use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File};
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::Path;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::debug;

use crate::error::FetchError;

/// Replace everything outside `[A-Za-z0-9]` so a word can be used in a
/// filename.
pub fn sanitize(word: &str) -> String {
    word.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Filename stem for media belonging to `word`: the sanitized word plus a
/// short hash of the full word, so words that sanitize alike stay apart.
pub fn media_stem(word: &str) -> String {
    let mut hasher = DefaultHasher::new();
    word.hash(&mut hasher);
    format!("{}_{:08x}", sanitize(word), hasher.finish() as u32)
}

/// Send a GET request and fail on any non-success status.
pub fn get(client: &Client, url: Url) -> Result<Response, FetchError> {
    debug!(%url, "downloading");
    let res = client.get(url).send()?;
    if !res.status().is_success() {
        return Err(FetchError::Status(res.status()));
    }
    Ok(res)
}

/// The response's `Content-Type` without parameters, if any.
pub fn content_type(res: &Response) -> Option<String> {
    let value = res.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let mime = value.split(';').next()?.trim().to_ascii_lowercase();
    (!mime.is_empty()).then_some(mime)
}

/// Stream the body of `res` into `path`. A failed or empty download leaves no
/// file behind.
pub fn save(mut res: Response, path: &Path) -> Result<(), FetchError> {
    let io_err = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    let mut file = File::create(path).map_err(io_err)?;
    let written = match res.copy_to(&mut file) {
        Ok(n) => n,
        Err(e) => {
            drop(file);
            let _ = fs::remove_file(path);
            return Err(e.into());
        }
    };
    file.flush().map_err(io_err)?;
    drop(file);

    if written == 0 {
        let _ = fs::remove_file(path);
        return Err(FetchError::Empty);
    }
    debug!(path = %path.display(), bytes = written, "saved download");
    Ok(())
}
