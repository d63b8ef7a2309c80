//! Pronunciation audio, downloaded once per word and cached on disk

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::vocabulary::normalize_word;

pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";

#[derive(Error, Debug)]
pub enum PronunciationError {
    #[error("Invalid word: {0}")]
    InvalidWord(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Text-to-speech request failed with status {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PronunciationError>;

/// Fetches spoken audio for words into `<audio_dir>/tts_<word>.mp3`
pub struct Pronouncer {
    client: Client,
    audio_dir: PathBuf,
    endpoint: String,
    language: String,
}

impl Pronouncer {
    pub fn new(audio_dir: PathBuf, language: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            audio_dir,
            endpoint: DEFAULT_TTS_URL.to_string(),
            language: language.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Cache location for a word's audio
    pub fn audio_path(&self, word: &str) -> Result<PathBuf> {
        let word = normalize_word(word).ok_or_else(|| PronunciationError::InvalidWord(word.trim().to_string()))?;
        Ok(self.audio_dir.join(format!("tts_{}.mp3", word)))
    }

    pub fn is_cached(&self, word: &str) -> bool {
        self.audio_path(word).map(|p| p.exists()).unwrap_or(false)
    }

    /// Return the audio file for `word`, downloading it if not cached yet.
    pub fn ensure_audio(&self, word: &str) -> Result<PathBuf> {
        let path = self.audio_path(word)?;
        if path.exists() {
            log::debug!("Using cached audio {:?}", path);
            return Ok(path);
        }

        let word = normalize_word(word).unwrap_or_default();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", self.language.as_str()),
                ("q", word.as_str()),
            ])
            .send()?;

        if !response.status().is_success() {
            log::warn!("TTS request for {} failed with status {}", word, response.status());
            return Err(PronunciationError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes()?;
        fs::create_dir_all(&self.audio_dir)?;

        // A partial download must never look cached
        let partial = path.with_extension("mp3.part");
        fs::write(&partial, &bytes)?;
        fs::rename(&partial, &path)?;

        log::info!("Saved pronunciation for {} to {:?}", word, path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn pronouncer(dir: &Path) -> Pronouncer {
        Pronouncer::new(dir.join("audio"), "en", Duration::from_secs(1))
            .unwrap()
            // Nothing listens here; tests must never reach the network
            .with_endpoint("http://127.0.0.1:9/translate_tts")
    }

    #[test]
    fn test_audio_path_is_per_word() {
        let temp = TempDir::new().unwrap();
        let p = pronouncer(temp.path());

        assert_eq!(
            p.audio_path(" Apple ").unwrap(),
            temp.path().join("audio").join("tts_apple.mp3")
        );
    }

    #[test]
    fn test_invalid_word_is_rejected() {
        let temp = TempDir::new().unwrap();
        let p = pronouncer(temp.path());

        assert!(matches!(p.audio_path("../etc"), Err(PronunciationError::InvalidWord(_))));
        assert!(matches!(p.ensure_audio("two words"), Err(PronunciationError::InvalidWord(_))));
        assert!(!p.is_cached("two words"));
    }

    #[test]
    fn test_cached_audio_is_reused() {
        let temp = TempDir::new().unwrap();
        let p = pronouncer(temp.path());

        let path = p.audio_path("hello").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"ID3").unwrap();

        assert!(p.is_cached("hello"));
        assert_eq!(p.ensure_audio("hello").unwrap(), path);
        assert_eq!(fs::read(&path).unwrap(), b"ID3");
    }

    #[test]
    fn test_failed_download_leaves_no_file() {
        let temp = TempDir::new().unwrap();
        let p = pronouncer(temp.path());

        assert!(matches!(p.ensure_audio("hello"), Err(PronunciationError::Http(_))));
        assert!(!p.is_cached("hello"));
    }
}
