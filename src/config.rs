//! Application configuration
//!
//! Read from `<data_dir>/config.toml` when present. Every field has a
//! default, so a missing file or a partial one both work.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enrichment::{GeminiOptions, TranslationLanguages};
use crate::frequency::{FrequencyList, DEFAULT_TOP_WORDS_LIMIT};
use crate::vocabulary::ReviewPolicy;

pub const CONFIG_FILE: &str = "config.toml";
pub const DATABASE_FILE: &str = "vocabulary.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Word frequency dataset (`word,frequency` CSV); relative paths are
    /// resolved against the data directory
    pub dataset_path: PathBuf,
    pub top_words_path: PathBuf,
    pub top_words_limit: usize,
    pub default_batch_size: usize,
    pub request_timeout_secs: u64,
    pub primary_language: String,
    pub secondary_language: String,
    /// Upper bound for review intervals, unbounded when unset
    pub max_interval_days: Option<u32>,
    pub tts_language: String,
    pub gemini_base_url: Option<String>,

    #[serde(skip)]
    data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let languages = TranslationLanguages::default();
        Self {
            dataset_path: PathBuf::from("unigram_freq.csv"),
            top_words_path: PathBuf::from("top_words.txt"),
            top_words_limit: DEFAULT_TOP_WORDS_LIMIT,
            default_batch_size: 10,
            request_timeout_secs: 30,
            primary_language: languages.primary,
            secondary_language: languages.secondary,
            max_interval_days: None,
            tts_language: "en".to_string(),
            gemini_base_url: None,
            data_dir: PathBuf::new(),
        }
    }
}

/// `<local data dir>/lexideck`
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join("lexideck"))
        .ok_or(ConfigError::DataDirNotFound)
}

impl AppConfig {
    /// Load the config for `data_dir`, falling back to defaults when the
    /// file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: AppConfig = toml::from_str(&content)?;
            log::debug!("Loaded config from {:?}", path);
            config
        } else {
            AppConfig::default()
        };

        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(&self.dataset_path)
    }

    pub fn top_words_path(&self) -> PathBuf {
        self.resolve(&self.top_words_path)
    }

    pub fn export_path(&self) -> PathBuf {
        self.data_dir.join("vocabulary_export.csv")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.data_dir.join("audio")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn review_policy(&self) -> ReviewPolicy {
        ReviewPolicy {
            max_interval_days: self.max_interval_days,
        }
    }

    pub fn gemini_options(&self) -> GeminiOptions {
        let defaults = GeminiOptions::default();
        GeminiOptions {
            base_url: self.gemini_base_url.clone().unwrap_or(defaults.base_url),
            timeout: self.request_timeout(),
            languages: TranslationLanguages {
                primary: self.primary_language.clone(),
                secondary: self.secondary_language.clone(),
            },
        }
    }

    pub fn frequency_list(&self) -> FrequencyList {
        FrequencyList::new(self.dataset_path(), self.top_words_path(), self.top_words_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(temp.path()).unwrap();

        assert_eq!(config.top_words_limit, 10_000);
        assert_eq!(config.default_batch_size, 10);
        assert_eq!(config.max_interval_days, None);
        assert_eq!(config.database_path(), temp.path().join("vocabulary.db"));
        assert_eq!(config.dataset_path(), temp.path().join("unigram_freq.csv"));
        assert_eq!(config.audio_dir(), temp.path().join("audio"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "max_interval_days = 180\nprimary_language = \"Korean\"\ndataset_path = \"/srv/freq.csv\"\n",
        )
        .unwrap();

        let config = AppConfig::load(temp.path()).unwrap();
        assert_eq!(config.review_policy().max_interval_days, Some(180));
        assert_eq!(config.gemini_options().languages.primary, "Korean");
        assert_eq!(config.secondary_language, TranslationLanguages::default().secondary);
        assert_eq!(config.dataset_path(), PathBuf::from("/srv/freq.csv"));
        assert_eq!(config.top_words_path(), temp.path().join("top_words.txt"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "top_words_limit = \"lots\"").unwrap();

        assert!(matches!(AppConfig::load(temp.path()), Err(ConfigError::Toml(_))));
    }
}
