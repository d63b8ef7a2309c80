//! Gemini `generateContent` client

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::gateway::{
    build_prompt, parse_details, EnrichmentError, EnrichmentGateway, Result, TranslationLanguages,
};
use crate::settings::SettingsStore;
use crate::vocabulary::WordDetails;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Connection options for the Gemini client
#[derive(Debug, Clone)]
pub struct GeminiOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub languages: TranslationLanguages,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            languages: TranslationLanguages::default(),
        }
    }
}

/// Enrichment gateway backed by the Gemini API.
///
/// Credential and model are read from the settings store before each call.
pub struct GeminiGateway {
    client: Client,
    settings: SettingsStore,
    options: GeminiOptions,
}

impl GeminiGateway {
    pub fn new(settings: SettingsStore, options: GeminiOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.timeout.min(Duration::from_secs(10)))
            .build()?;

        let base_url = options.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            settings,
            options: GeminiOptions { base_url, ..options },
        })
    }

    fn generate(&self, prompt: &str) -> Result<String> {
        let (api_key, model) = self.settings.credentials()?;
        let api_key = api_key.ok_or(EnrichmentError::NotConfigured)?;

        let url = format!("{}/models/{}:generateContent", self.options.base_url, model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            if matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                log::error!("Invalid API key or model {}: {}", model, status);
            }
            return Err(EnrichmentError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json()?;
        Ok(body.text())
    }
}

impl EnrichmentGateway for GeminiGateway {
    fn is_configured(&self) -> bool {
        matches!(self.settings.api_key(), Ok(Some(_)))
    }

    fn validate(&self) -> Result<bool> {
        match self.generate("Test") {
            Ok(_) => {
                log::info!("Gemini API validated successfully");
                Ok(true)
            }
            Err(EnrichmentError::Settings(e)) => Err(EnrichmentError::Settings(e)),
            Err(e) => {
                log::error!("Failed to validate Gemini API: {}", e);
                Ok(false)
            }
        }
    }

    fn try_fetch_details(&self, word: &str) -> Result<WordDetails> {
        let prompt = build_prompt(word, &self.options.languages);
        let text = self.generate(&prompt)?;
        let details = parse_details(&text);

        if details.is_blank() {
            return Err(EnrichmentError::EmptyResponse(word.to_string()));
        }

        log::info!(
            "Fetched details for word {}: POS={}, tense={}",
            word,
            details.part_of_speech,
            details.tense_info
        );
        Ok(details)
    }
}
