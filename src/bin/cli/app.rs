use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use lexideck_lib::config::{default_data_dir, AppConfig};
use lexideck_lib::database::Database;
use lexideck_lib::enrichment::{EnrichmentGateway, GeminiGateway};
use lexideck_lib::navigation::Readiness;
use lexideck_lib::pronunciation::Pronouncer;
use lexideck_lib::settings::SettingsStore;
use lexideck_lib::vocabulary::{VocabularyEntry, VocabularyStorage};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub store: VocabularyStorage,
    pub settings: SettingsStore,
}

impl App {
    /// Open the data directory, its config and its database
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir().context("Failed to get data directory")?,
        };

        let config = AppConfig::load(&data_dir)
            .with_context(|| format!("Failed to load config from {}", data_dir.display()))?;

        let db = Database::open(&config.database_path())
            .context("Failed to open vocabulary database")?;
        let db = Arc::new(db);

        Ok(Self {
            store: VocabularyStorage::with_policy(db.clone(), config.review_policy()),
            settings: SettingsStore::new(db),
            config,
        })
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn gateway(&self) -> Result<GeminiGateway> {
        GeminiGateway::new(self.settings.clone(), self.config.gemini_options())
            .context("Failed to create enrichment client")
    }

    pub fn pronouncer(&self) -> Result<Pronouncer> {
        Pronouncer::new(
            self.config.audio_dir(),
            &self.config.tts_language,
            self.config.request_timeout(),
        )
        .context("Failed to create text-to-speech client")
    }

    /// Whether screens that need the enrichment service can be shown.
    /// Without `validate` a stored key is taken on trust.
    pub fn readiness(&self, validate: bool) -> Result<Readiness> {
        let gateway = self.gateway()?;
        let has_credential = gateway.is_configured();
        let validated = if has_credential && validate {
            gateway.validate().context("Failed to validate API key")?
        } else {
            has_credential
        };

        Ok(Readiness {
            has_credential,
            validated,
        })
    }

    /// Find a stored word (case-insensitive)
    pub fn find_entry(&self, word: &str) -> Result<VocabularyEntry> {
        self.store
            .find_by_word(word)
            .context("Failed to look up word")?
            .with_context(|| format!("Word '{}' is not in the vocabulary", word.trim()))
    }
}
