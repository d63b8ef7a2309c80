//! Enrichment gateway contract and response parsing

use thiserror::Error;

use crate::settings::SettingsError;
use crate::vocabulary::{WordDetails, UNKNOWN};

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Enrichment service is not configured: set an API key first")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Service returned no usable content for '{0}'")]
    EmptyResponse(String),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

pub type Result<T> = std::result::Result<T, EnrichmentError>;

/// Languages the translations are requested in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationLanguages {
    pub primary: String,
    pub secondary: String,
}

impl Default for TranslationLanguages {
    fn default() -> Self {
        Self {
            primary: "Traditional Chinese".to_string(),
            secondary: "Japanese".to_string(),
        }
    }
}

/// Line labels, in the order the service is asked to answer
const LABELS: [&str; 7] = [
    "Primary Translation:",
    "Secondary Translation:",
    "Example:",
    "Primary Example Translation:",
    "Secondary Example Translation:",
    "Part of Speech:",
    "Tense Changes:",
];

/// External service that supplies translations and examples for a word.
pub trait EnrichmentGateway {
    /// A credential is available.
    fn is_configured(&self) -> bool;

    /// Perform a live round trip to check the credential and model.
    fn validate(&self) -> Result<bool>;

    /// Fetch details, reporting failures to the caller.
    fn try_fetch_details(&self, word: &str) -> Result<WordDetails>;

    /// Fetch details, degrading to blank text and "unknown" on any failure.
    fn fetch_details(&self, word: &str) -> WordDetails {
        match self.try_fetch_details(word) {
            Ok(details) => details,
            Err(e) => {
                log::error!("Failed to fetch details for word {}: {}", word, e);
                WordDetails::unknown()
            }
        }
    }
}

/// Prompt asking for the seven labelled lines `parse_details` reads back.
pub fn build_prompt(word: &str, languages: &TranslationLanguages) -> String {
    format!(
        "Provide the following for the English word '{word}':\n\
         1. Its direct {primary} translation.\n\
         2. Its direct {secondary} translation.\n\
         3. An example sentence using the word.\n\
         4. The {primary} translation of the example sentence.\n\
         5. The {secondary} translation of the example sentence.\n\
         6. Part of speech.\n\
         7. Tense changes (if applicable).\n\
         Answer with exactly these seven lines and nothing else:\n\
         {l0} <translation>\n\
         {l1} <translation>\n\
         {l2} <sentence>\n\
         {l3} <translation>\n\
         {l4} <translation>\n\
         {l5} <part of speech>\n\
         {l6} <tense changes>",
        word = word,
        primary = languages.primary,
        secondary = languages.secondary,
        l0 = LABELS[0],
        l1 = LABELS[1],
        l2 = LABELS[2],
        l3 = LABELS[3],
        l4 = LABELS[4],
        l5 = LABELS[5],
        l6 = LABELS[6],
    )
}

fn strip_label<'a>(line: &'a str, label: &str) -> &'a str {
    let line = line.trim().trim_start_matches(['*', '-', ' ']);
    let stripped = match line.get(..label.len()) {
        Some(head) if head.eq_ignore_ascii_case(label) => &line[label.len()..],
        _ => line,
    };
    stripped.trim().trim_start_matches('*').trim()
}

/// Parse the positional answer. Missing lines become empty text, or the
/// "unknown" sentinel for part of speech and tense.
pub fn parse_details(text: &str) -> WordDetails {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    let field = |i: usize| -> String {
        lines
            .get(i)
            .map(|line| strip_label(line, LABELS[i]).to_string())
            .unwrap_or_default()
    };
    let or_unknown = |s: String| if s.is_empty() { UNKNOWN.to_string() } else { s };

    WordDetails {
        translation_primary: field(0),
        translation_secondary: field(1),
        example: field(2),
        example_translation_primary: field(3),
        example_translation_secondary: field(4),
        part_of_speech: or_unknown(field(5)),
        tense_info: or_unknown(field(6)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let text = "Primary Translation: 書\n\
                    Secondary Translation: 本\n\
                    \n\
                    Example: I read a book.\n\
                    Primary Example Translation: 我讀了一本書。\n\
                    Secondary Example Translation: 私は本を読んだ。\n\
                    Part of Speech: noun\n\
                    Tense Changes: books\n";

        let details = parse_details(text);
        assert_eq!(details.translation_primary, "書");
        assert_eq!(details.translation_secondary, "本");
        assert_eq!(details.example, "I read a book.");
        assert_eq!(details.example_translation_primary, "我讀了一本書。");
        assert_eq!(details.example_translation_secondary, "私は本を読んだ。");
        assert_eq!(details.part_of_speech, "noun");
        assert_eq!(details.tense_info, "books");
    }

    #[test]
    fn test_parse_short_response_defaults_missing_fields() {
        let details = parse_details("Primary Translation: 跑\nSecondary Translation: 走る");

        assert_eq!(details.translation_primary, "跑");
        assert_eq!(details.translation_secondary, "走る");
        assert_eq!(details.example, "");
        assert_eq!(details.example_translation_secondary, "");
        assert_eq!(details.part_of_speech, UNKNOWN);
        assert_eq!(details.tense_info, UNKNOWN);
    }

    #[test]
    fn test_parse_empty_response() {
        assert_eq!(parse_details(""), WordDetails::unknown());
    }

    #[test]
    fn test_parse_tolerates_markdown_and_case() {
        let details = parse_details("**Primary Translation:** 貓\n- secondary translation: 猫");
        assert_eq!(details.translation_primary, "貓");
        assert_eq!(details.translation_secondary, "猫");
    }

    #[test]
    fn test_unlabelled_lines_are_kept() {
        let details = parse_details("快樂\nうれしい\nShe is happy.");
        assert_eq!(details.translation_primary, "快樂");
        assert_eq!(details.example, "She is happy.");
    }

    #[test]
    fn test_prompt_mentions_word_and_languages() {
        let prompt = build_prompt("river", &TranslationLanguages::default());
        assert!(prompt.contains("'river'"));
        assert!(prompt.contains("Traditional Chinese"));
        assert!(prompt.contains("Japanese"));
        for label in LABELS {
            assert!(prompt.contains(label));
        }
    }

    struct Failing;

    impl EnrichmentGateway for Failing {
        fn is_configured(&self) -> bool {
            true
        }

        fn validate(&self) -> Result<bool> {
            Ok(false)
        }

        fn try_fetch_details(&self, word: &str) -> Result<WordDetails> {
            Err(EnrichmentError::EmptyResponse(word.to_string()))
        }
    }

    #[test]
    fn test_fetch_details_degrades_softly() {
        assert_eq!(Failing.fetch_details("river"), WordDetails::unknown());
    }
}
