// Browser launcher: opens an image search and a dictionary page for the word
// so the user can pick a picture and double-check the definition.

use std::io;
use std::process::{Command, Stdio};

use reqwest::Url;
use tracing::debug;

use crate::error::LaunchError;

const IMAGE_SEARCH: &str = "https://www.google.com/search";
const DICTIONARY: &str = "https://en.wiktionary.org/wiki/";

/// The image search and dictionary URLs for `word`.
pub fn reference_urls(word: &str) -> Result<[Url; 2], LaunchError> {
    let images = Url::parse_with_params(IMAGE_SEARCH, &[("tbm", "isch"), ("q", word)])
        .map_err(|e| invalid(IMAGE_SEARCH, e))?;

    let mut dictionary = Url::parse(DICTIONARY).map_err(|e| invalid(DICTIONARY, e))?;
    if let Ok(mut segments) = dictionary.path_segments_mut() {
        segments.pop_if_empty().push(word);
    }

    Ok([images, dictionary])
}

fn invalid(target: &str, e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> LaunchError {
    LaunchError {
        target: target.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    }
}

/// Open the reference pages. With a browser command both pages go to one
/// detached process; otherwise each goes to the system default browser.
pub fn open_references(word: &str, browser: Option<&str>) -> Result<(), LaunchError> {
    let urls = reference_urls(word)?;

    if let Some(browser) = browser {
        debug!(browser, "launching browser");
        Command::new(browser)
            .args(urls.iter().map(Url::as_str))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError {
                target: browser.to_string(),
                source,
            })?;
        return Ok(());
    }

    for url in &urls {
        debug!(%url, "opening in default browser");
        open::that(url.as_str()).map_err(|source| LaunchError {
            target: url.to_string(),
            source,
        })?;
    }
    Ok(())
}
