// Audio fetcher: downloads a pronunciation clip for a word from the
// text-to-speech endpoint and keeps it in the working directory until the
// card has been submitted.

use reqwest::blocking::Client;
use reqwest::Url;

use crate::config::Config;
use crate::draft::MediaFile;
use crate::error::FetchError;
use crate::fetch;

/// Media filename used for the pronunciation of `word`.
pub fn audio_filename(word: &str) -> String {
    format!("anki_audio_{}.mp3", fetch::media_stem(word))
}

/// Build the text-to-speech request URL for `word`.
pub fn audio_url(config: &Config, word: &str) -> Result<Url, FetchError> {
    Url::parse_with_params(
        &config.audio_url,
        &[
            ("ie", "UTF-8"),
            ("client", "tw-ob"),
            ("tl", config.language.as_str()),
            ("q", word),
        ],
    )
    .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", config.audio_url)))
}

/// Download the pronunciation of `word` into the working directory.
pub fn fetch_audio(client: &Client, config: &Config, word: &str) -> Result<MediaFile, FetchError> {
    let url = audio_url(config, word)?;
    let filename = audio_filename(word);
    let path = config.work_dir.join(&filename);

    let res = fetch::get(client, url)?;
    fetch::save(res, &path)?;

    Ok(MediaFile {
        path,
        filename,
        downloaded: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_derived_from_word() {
        let name = audio_filename("give up");
        assert!(name.starts_with("anki_audio_give_up_"));
        assert!(name.ends_with(".mp3"));
        assert_eq!(name, audio_filename("give up"));
    }

    #[test]
    fn words_in_other_scripts_get_their_own_file() {
        assert_ne!(audio_filename("кот"), audio_filename("пёс"));
        assert_ne!(audio_filename("ice cream"), audio_filename("ice-cream"));
    }

    #[test]
    fn url_carries_word_and_language() {
        let config = Config::default();
        let url = audio_url(&config, "give up").unwrap();
        assert_eq!(url.host_str(), Some("translate.google.com"));
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("q".into(), "give up".into())));
        assert!(query.contains(&("tl".into(), "en".into())));
    }

    #[test]
    fn bad_endpoint_is_a_fetch_error() {
        let config = Config {
            audio_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            audio_url(&config, "word"),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
