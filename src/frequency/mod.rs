//! Frequency-ranked candidate words
//!
//! Builds the list of the most frequent valid words from a `word,frequency`
//! CSV dataset and caches it as a newline-delimited file. The cache is reused
//! until it is deleted.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::vocabulary::normalize_word;

/// Default size of the cached list
pub const DEFAULT_TOP_WORDS_LIMIT: usize = 10_000;

#[derive(Error, Debug)]
pub enum FrequencyListError {
    #[error("Dataset file not found: {0}")]
    DatasetMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, FrequencyListError>;

/// One row of the frequency dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateWord {
    pub word: String,
    pub frequency: u64,
}

impl CandidateWord {
    pub fn new(word: impl Into<String>, frequency: u64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }
}

/// Rank valid words by descending frequency, keeping dataset order for ties.
///
/// Words are trimmed and lowercased; invalid words are dropped, and only the
/// first (highest ranked) occurrence of a word is kept.
pub fn build_top_words(rows: &[CandidateWord], limit: usize) -> Vec<String> {
    let mut valid: Vec<(String, u64)> = rows
        .iter()
        .filter_map(|row| normalize_word(&row.word).map(|w| (w, row.frequency)))
        .collect();

    // sort_by is stable, so equal frequencies keep their dataset order
    valid.sort_by(|a, b| b.1.cmp(&a.1));

    let mut seen = HashSet::new();
    valid
        .into_iter()
        .map(|(word, _)| word)
        .filter(|word| seen.insert(word.clone()))
        .take(limit)
        .collect()
}

/// Read `word,frequency` rows, skipping the header, short rows and
/// non-numeric frequencies.
pub fn read_dataset(path: &Path) -> Result<Vec<CandidateWord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            continue;
        }

        let word = record.get(0).unwrap_or_default();
        match record.get(1).unwrap_or_default().trim().parse::<u64>() {
            Ok(frequency) => rows.push(CandidateWord::new(word, frequency)),
            Err(_) => log::warn!("Skipping dataset row with bad frequency: {:?}", word),
        }
    }

    Ok(rows)
}

/// Cached top-words list backed by a frequency dataset
#[derive(Debug, Clone)]
pub struct FrequencyList {
    dataset_path: PathBuf,
    cache_path: PathBuf,
    limit: usize,
}

impl FrequencyList {
    pub fn new(dataset_path: PathBuf, cache_path: PathBuf, limit: usize) -> Self {
        Self {
            dataset_path,
            cache_path,
            limit,
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn is_cached(&self) -> bool {
        self.cache_path.exists()
    }

    /// Load the cached list, building it from the dataset first if needed.
    pub fn load_or_build(&self) -> Result<Vec<String>> {
        if self.cache_path.exists() {
            log::debug!("Top words list already exists: {:?}", self.cache_path);
            return self.read_cache();
        }

        if !self.dataset_path.exists() {
            return Err(FrequencyListError::DatasetMissing(self.dataset_path.clone()));
        }

        let rows = read_dataset(&self.dataset_path)?;
        let top_words = build_top_words(&rows, self.limit);
        self.write_cache(&top_words)?;

        log::info!(
            "Generated top {} words list to {:?}",
            top_words.len(),
            self.cache_path
        );
        Ok(top_words)
    }

    /// Delete the cached list so the next load rebuilds it.
    pub fn invalidate(&self) -> Result<()> {
        if self.cache_path.exists() {
            fs::remove_file(&self.cache_path)?;
            log::info!("Removed top words cache {:?}", self.cache_path);
        }
        Ok(())
    }

    fn read_cache(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.cache_path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn write_cache(&self, words: &[String]) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = words.join("\n");
        content.push('\n');
        fs::write(&self.cache_path, content)?;
        Ok(())
    }
}
