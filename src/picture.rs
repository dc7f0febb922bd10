// Picture resolver: turns the free-text picture answer into an optional media
// file. A URL is downloaded into the working directory, anything else is
// treated as a path to an existing image.

use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::Url;

use crate::config::Config;
use crate::draft::MediaFile;
use crate::error::PictureError;
use crate::fetch;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];
const DEFAULT_EXTENSION: &str = "jpg";

/// What the user typed at the picture prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureInput {
    None,
    Url(Url),
    Path(PathBuf),
}

/// Classify a picture answer. Surrounding quotes (as left by terminals when a
/// file is dragged in) are stripped.
pub fn classify(input: &str) -> Result<PictureInput, PictureError> {
    let text = input
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"')
        .trim();
    if text.is_empty() {
        return Ok(PictureInput::None);
    }

    let lower = text.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Url::parse(text)
            .ok()
            .filter(|url| url.host_str().is_some_and(|host| !host.is_empty()))
            .map(PictureInput::Url)
            .ok_or_else(|| PictureError::InvalidUrl(text.to_string()));
    }

    Ok(PictureInput::Path(expand_home(text)))
}

/// Resolve a picture answer for the card of `word`.
pub fn resolve(
    client: &Client,
    config: &Config,
    word: &str,
    input: &str,
) -> Result<Option<MediaFile>, PictureError> {
    match classify(input)? {
        PictureInput::None => Ok(None),
        PictureInput::Url(url) => download(client, config, word, url).map(Some),
        PictureInput::Path(path) => from_path(word, path).map(Some),
    }
}

fn download(
    client: &Client,
    config: &Config,
    word: &str,
    url: Url,
) -> Result<MediaFile, PictureError> {
    let from_url = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| image_extension(Path::new(name)));

    let res = fetch::get(client, url)?;
    let ext = from_url
        .or_else(|| fetch::content_type(&res).and_then(|mime| extension_for_mime(&mime)))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    let filename = media_name(word, &ext);
    let path = config.work_dir.join(&filename);
    fetch::save(res, &path)?;

    Ok(MediaFile {
        path,
        filename,
        downloaded: true,
    })
}

fn from_path(word: &str, path: PathBuf) -> Result<MediaFile, PictureError> {
    if !path.is_file() {
        return Err(PictureError::NotFound(path));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    Ok(MediaFile {
        filename: media_name(word, &ext),
        path,
        downloaded: false,
    })
}

fn media_name(word: &str, ext: &str) -> String {
    format!("anki_img_{}.{ext}", fetch::media_stem(word))
}

fn image_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

fn extension_for_mime(mime: &str) -> Option<String> {
    let ext = match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/bmp" => "bmp",
        _ => return None,
    };
    Some(ext.to_string())
}

fn expand_home(text: &str) -> PathBuf {
    match (text.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(text),
    }
}
