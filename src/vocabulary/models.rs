//! Data models for the vocabulary store

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on creation
pub type EntryId = i64;

/// Sentinel stored for part of speech and tense when nothing is known
pub const UNKNOWN: &str = "unknown";

fn word_regex() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(r"^[a-zA-Z]+$").expect("static word pattern"))
}

/// True if `word` consists only of ASCII letters.
pub fn is_valid_word(word: &str) -> bool {
    word_regex().is_match(word)
}

/// Trim and lowercase a word, returning `None` if it is not purely alphabetic.
pub fn normalize_word(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_valid_word(trimmed) {
        Some(trimmed.to_lowercase())
    } else {
        None
    }
}

/// Enrichment fields for a word, as produced by the enrichment gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetails {
    pub example: String,
    pub translation_primary: String,
    pub translation_secondary: String,
    pub example_translation_primary: String,
    pub example_translation_secondary: String,
    pub part_of_speech: String,
    pub tense_info: String,
}

impl WordDetails {
    /// Blank text with the sentinel part of speech and tense.
    pub fn unknown() -> Self {
        Self {
            part_of_speech: UNKNOWN.to_string(),
            tense_info: UNKNOWN.to_string(),
            ..Default::default()
        }
    }

    /// No translation or example text at all.
    pub fn is_blank(&self) -> bool {
        self.example.is_empty()
            && self.translation_primary.is_empty()
            && self.translation_secondary.is_empty()
            && self.example_translation_primary.is_empty()
            && self.example_translation_secondary.is_empty()
    }

    /// Fill every empty (or sentinel) field of `self` from `fallback`.
    pub fn or_else(self, fallback: WordDetails) -> WordDetails {
        fn pick(value: String, fallback: String) -> String {
            if value.is_empty() || value == UNKNOWN {
                if fallback.is_empty() { value } else { fallback }
            } else {
                value
            }
        }

        WordDetails {
            example: pick(self.example, fallback.example),
            translation_primary: pick(self.translation_primary, fallback.translation_primary),
            translation_secondary: pick(self.translation_secondary, fallback.translation_secondary),
            example_translation_primary: pick(
                self.example_translation_primary,
                fallback.example_translation_primary,
            ),
            example_translation_secondary: pick(
                self.example_translation_secondary,
                fallback.example_translation_secondary,
            ),
            part_of_speech: pick(self.part_of_speech, fallback.part_of_speech),
            tense_info: pick(self.tense_info, fallback.tense_info),
        }
    }
}

/// Fields supplied when creating an entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub example: String,
    pub translation_primary: String,
    pub translation_secondary: String,
    pub example_translation_primary: String,
    pub example_translation_secondary: String,
    pub part_of_speech: Option<String>,
    pub tense_info: Option<String>,
}

impl NewEntry {
    /// Text typed in by the user for an explicitly added word. Stored verbatim.
    pub fn user_supplied(example: String, translation_primary: String, translation_secondary: String) -> Self {
        Self {
            example,
            translation_primary,
            translation_secondary,
            ..Default::default()
        }
    }

    pub fn from_details(details: WordDetails) -> Self {
        Self {
            example: details.example,
            translation_primary: details.translation_primary,
            translation_secondary: details.translation_secondary,
            example_translation_primary: details.example_translation_primary,
            example_translation_secondary: details.example_translation_secondary,
            part_of_speech: Some(details.part_of_speech).filter(|s| !s.is_empty()),
            tense_info: Some(details.tense_info).filter(|s| !s.is_empty()),
        }
    }
}

/// One stored vocabulary word with its review metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: EntryId,
    pub word: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub translation_primary: String,
    #[serde(default)]
    pub translation_secondary: String,
    #[serde(default)]
    pub example_translation_primary: String,
    #[serde(default)]
    pub example_translation_secondary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tense_info: Option<String>,
    #[serde(default = "default_familiarity")]
    pub familiarity: i32,
    pub last_reviewed: Option<NaiveDate>,
    #[serde(default)]
    pub learned: bool,
    #[serde(default)]
    pub mastered: bool,
    #[serde(default = "default_interval")]
    pub interval: u32,
    pub next_review: Option<NaiveDate>,
}

fn default_familiarity() -> i32 {
    1
}

fn default_interval() -> u32 {
    1
}

impl VocabularyEntry {
    /// A never-reviewed entry, as created by acquisition.
    pub fn new(id: EntryId, word: String) -> Self {
        Self {
            id,
            word,
            example: String::new(),
            translation_primary: String::new(),
            translation_secondary: String::new(),
            example_translation_primary: String::new(),
            example_translation_secondary: String::new(),
            part_of_speech: None,
            tense_info: None,
            familiarity: default_familiarity(),
            last_reviewed: None,
            learned: false,
            mastered: false,
            interval: default_interval(),
            next_review: None,
        }
    }

    /// All seven enrichment fields are present and non-empty.
    pub fn is_fully_enriched(&self) -> bool {
        let filled = |s: &str| !s.trim().is_empty();
        filled(&self.example)
            && filled(&self.translation_primary)
            && filled(&self.translation_secondary)
            && filled(&self.example_translation_primary)
            && filled(&self.example_translation_secondary)
            && self.part_of_speech.as_deref().map_or(false, filled)
            && self.tense_info.as_deref().map_or(false, filled)
    }

    /// Learned, not mastered, and scheduled on or before `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.learned && !self.mastered && self.next_review.map_or(false, |d| d <= today)
    }

    pub fn part_of_speech_or_unknown(&self) -> &str {
        self.part_of_speech.as_deref().filter(|s| !s.is_empty()).unwrap_or(UNKNOWN)
    }

    pub fn tense_info_or_unknown(&self) -> &str {
        self.tense_info.as_deref().filter(|s| !s.is_empty()).unwrap_or(UNKNOWN)
    }

    /// Current enrichment fields, with sentinels where absent.
    pub fn details(&self) -> WordDetails {
        WordDetails {
            example: self.example.clone(),
            translation_primary: self.translation_primary.clone(),
            translation_secondary: self.translation_secondary.clone(),
            example_translation_primary: self.example_translation_primary.clone(),
            example_translation_secondary: self.example_translation_secondary.clone(),
            part_of_speech: self.part_of_speech_or_unknown().to_string(),
            tense_info: self.tense_info_or_unknown().to_string(),
        }
    }

    pub fn apply_details(&mut self, details: WordDetails) {
        self.example = details.example;
        self.translation_primary = details.translation_primary;
        self.translation_secondary = details.translation_secondary;
        self.example_translation_primary = details.example_translation_primary;
        self.example_translation_secondary = details.example_translation_secondary;
        self.part_of_speech = Some(details.part_of_speech).filter(|s| !s.is_empty());
        self.tense_info = Some(details.tense_info).filter(|s| !s.is_empty());
    }
}

/// Which slice of the store a study pass works through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudyMode {
    /// Words never reviewed
    Learn,
    /// Learned words that are due
    Review,
    /// Words marked as mastered
    Mastered,
}

impl StudyMode {
    pub const ALL: [StudyMode; 3] = [StudyMode::Learn, StudyMode::Review, StudyMode::Mastered];

    pub fn as_str(&self) -> &'static str {
        match self {
            StudyMode::Learn => "learn",
            StudyMode::Review => "review",
            StudyMode::Mastered => "mastered",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "learn" => Ok(StudyMode::Learn),
            "review" => Ok(StudyMode::Review),
            "mastered" => Ok(StudyMode::Mastered),
            other => Err(format!("unknown study mode '{}' (expected learn, review or mastered)", other)),
        }
    }
}

/// Result of recording a review mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub familiarity: i32,
    pub interval: u32,
    pub next_review: NaiveDate,
}

/// Counts over the whole store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    pub total: usize,
    pub unlearned: usize,
    pub learned_not_mastered: usize,
    pub mastered: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_words() {
        for word in ["apple", "Apple", "a", "ZEBRA"] {
            assert!(is_valid_word(word), "{word} should be valid");
        }
    }

    #[test]
    fn test_invalid_words() {
        for word in ["", "1dog", "dog1", "two words", "don't", "café", "co-op", " tab\t"] {
            assert!(!is_valid_word(word), "{word:?} should be rejected");
        }
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Hello "), Some("hello".to_string()));
        assert_eq!(normalize_word("he llo"), None);
        assert_eq!(normalize_word("42"), None);
    }

    #[test]
    fn test_fully_enriched_requires_all_seven_fields() {
        let mut entry = VocabularyEntry::new(1, "run".to_string());
        assert!(!entry.is_fully_enriched());

        entry.apply_details(WordDetails {
            example: "I run daily.".to_string(),
            translation_primary: "跑".to_string(),
            translation_secondary: "走る".to_string(),
            example_translation_primary: "我每天跑步。".to_string(),
            example_translation_secondary: "私は毎日走る。".to_string(),
            part_of_speech: "verb".to_string(),
            tense_info: "ran, run".to_string(),
        });
        assert!(entry.is_fully_enriched());

        entry.tense_info = None;
        assert!(!entry.is_fully_enriched());
    }

    #[test]
    fn test_or_else_prefers_non_empty_values() {
        let fetched = WordDetails {
            example: "New example".to_string(),
            part_of_speech: UNKNOWN.to_string(),
            ..WordDetails::unknown()
        };
        let existing = WordDetails {
            translation_primary: "kept".to_string(),
            part_of_speech: "noun".to_string(),
            ..Default::default()
        };

        let merged = fetched.or_else(existing);
        assert_eq!(merged.example, "New example");
        assert_eq!(merged.translation_primary, "kept");
        assert_eq!(merged.part_of_speech, "noun");
        assert_eq!(merged.tense_info, UNKNOWN);
    }

    #[test]
    fn test_unknown_details_are_blank() {
        let details = WordDetails::unknown();
        assert!(details.is_blank());
        assert_eq!(details.part_of_speech, UNKNOWN);
        assert_eq!(details.tense_info, UNKNOWN);
    }

    #[test]
    fn test_study_mode_parse() {
        assert_eq!("Review".parse::<StudyMode>().unwrap(), StudyMode::Review);
        assert!("later".parse::<StudyMode>().is_err());
    }
}
