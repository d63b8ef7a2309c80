//! Word acquisition
//!
//! Grows the store either with one word the user typed in, or with a batch
//! of the most frequent words not stored yet, each enriched before insert.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::enrichment::EnrichmentGateway;
use crate::frequency::{FrequencyList, FrequencyListError};
use crate::vocabulary::{EntryId, NewEntry, VocabularyStorage, VocabularyStorageError};

/// Upper bound on words added by one batch
pub const MAX_BATCH_SIZE: usize = 100;

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Enrichment service is not ready: set a valid API key first")]
    Configuration,

    #[error(transparent)]
    Storage(#[from] VocabularyStorageError),

    #[error(transparent)]
    FrequencyList(#[from] FrequencyListError),
}

pub type Result<T> = std::result::Result<T, AcquisitionError>;

/// Outcome of a dataset batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionReport {
    pub added: Vec<String>,
    pub failed: Vec<String>,
    pub skipped_existing: usize,
    pub aborted: bool,
}

impl AcquisitionReport {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }
}

/// Outcome of an enrichment retry pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentReport {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
    pub aborted: bool,
}

/// Acquisition pipeline over a store, a frequency list and a gateway
pub struct WordAcquisition<'a, G: EnrichmentGateway + ?Sized> {
    store: &'a VocabularyStorage,
    frequency: &'a FrequencyList,
    gateway: &'a G,
    abort: Arc<AtomicBool>,
}

impl<'a, G: EnrichmentGateway + ?Sized> WordAcquisition<'a, G> {
    pub fn new(store: &'a VocabularyStorage, frequency: &'a FrequencyList, gateway: &'a G) -> Self {
        Self {
            store,
            frequency,
            gateway,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked between words; set it to stop a running batch.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// A stored credential that the service accepts.
    fn ensure_ready(&self) -> Result<()> {
        if !self.gateway.is_configured() {
            return Err(AcquisitionError::Configuration);
        }

        match self.gateway.validate() {
            Ok(true) => Ok(()),
            Ok(false) => {
                log::warn!("Enrichment service rejected the stored credential");
                Err(AcquisitionError::Configuration)
            }
            Err(e) => {
                log::error!("Could not validate enrichment service: {}", e);
                Err(AcquisitionError::Configuration)
            }
        }
    }

    fn aborted(&self) -> bool {
        self.abort.load(Ordering::Relaxed)
    }

    /// Add a word typed in by the user. Its text is stored as given and no
    /// enrichment is requested.
    pub fn add_explicit_word(&self, word: &str, fields: NewEntry) -> Result<EntryId> {
        Ok(self.store.create_entry(word, &fields)?)
    }

    /// The next `min(count, MAX_BATCH_SIZE)` frequency-ranked words not stored yet.
    pub fn next_words(&self, count: usize) -> Result<Vec<String>> {
        let top_words = self.frequency.load_or_build()?;
        let existing = self.store.existing_words()?;

        let words: Vec<String> = top_words
            .into_iter()
            .filter(|w| !existing.contains(w))
            .take(count.min(MAX_BATCH_SIZE))
            .collect();

        log::info!("Found {} words to add", words.len());
        Ok(words)
    }

    /// Enrich and insert the next words from the frequency list.
    ///
    /// A word whose enrichment fails is skipped; the batch continues.
    pub fn add_from_dataset(&self, count: usize) -> Result<AcquisitionReport> {
        self.ensure_ready()?;

        let mut report = AcquisitionReport::default();

        for word in self.next_words(count)? {
            if self.aborted() {
                log::warn!("Word acquisition aborted after {} words", report.added.len());
                report.aborted = true;
                break;
            }

            let details = match self.gateway.try_fetch_details(&word) {
                Ok(details) => details,
                Err(e) => {
                    log::error!("Failed to fetch details for word {}, skipping: {}", word, e);
                    report.failed.push(word);
                    continue;
                }
            };

            match self.store.create_entry(&word, &NewEntry::from_details(details)) {
                Ok(_) => {
                    log::info!("Added word from dataset: {}", word);
                    report.added.push(word);
                }
                Err(VocabularyStorageError::DuplicateWord(_)) => report.skipped_existing += 1,
                Err(e) => return Err(e.into()),
            }
        }

        log::info!("Added {} words from dataset", report.added.len());
        Ok(report)
    }

    /// Retry enrichment for stored entries missing any enrichment field.
    ///
    /// Fetched values fill the gaps; text already present is kept when the
    /// service leaves a field empty.
    pub fn enrich_incomplete(&self, limit: Option<usize>) -> Result<EnrichmentReport> {
        self.ensure_ready()?;

        let mut report = EnrichmentReport::default();
        let entries = self.store.incomplete_entries()?;

        for entry in entries.into_iter().take(limit.unwrap_or(usize::MAX)) {
            if self.aborted() {
                report.aborted = true;
                break;
            }

            match self.gateway.try_fetch_details(&entry.word) {
                Ok(details) => {
                    let merged = details.or_else(entry.details());
                    self.store.update_enrichment(entry.id, &merged)?;
                    report.updated.push(entry.word);
                }
                Err(e) => {
                    log::warn!("Enrichment retry failed for {}: {}", entry.word, e);
                    report.failed.push(entry.word);
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::Database;
    use crate::enrichment::EnrichmentError;
    use crate::vocabulary::{StudyMode, WordDetails};
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    /// In-memory gateway returning canned details
    pub(crate) struct FakeGateway {
        pub configured: bool,
        pub accepted: bool,
        pub failing: HashSet<String>,
        pub calls: RefCell<Vec<String>>,
        pub validations: Cell<usize>,
    }

    impl FakeGateway {
        pub(crate) fn new() -> Self {
            Self {
                configured: true,
                accepted: true,
                failing: HashSet::new(),
                calls: RefCell::new(Vec::new()),
                validations: Cell::new(0),
            }
        }

        pub(crate) fn failing_on(words: &[&str]) -> Self {
            Self {
                failing: words.iter().map(|w| w.to_string()).collect(),
                ..Self::new()
            }
        }

        pub(crate) fn details_for(word: &str) -> WordDetails {
            WordDetails {
                example: format!("This is {}.", word),
                translation_primary: format!("zh-{}", word),
                translation_secondary: format!("ja-{}", word),
                example_translation_primary: format!("zh-ex-{}", word),
                example_translation_secondary: format!("ja-ex-{}", word),
                part_of_speech: "noun".to_string(),
                tense_info: "n/a".to_string(),
            }
        }
    }

    impl EnrichmentGateway for FakeGateway {
        fn is_configured(&self) -> bool {
            self.configured
        }

        fn validate(&self) -> std::result::Result<bool, EnrichmentError> {
            self.validations.set(self.validations.get() + 1);
            Ok(self.configured && self.accepted)
        }

        fn try_fetch_details(&self, word: &str) -> std::result::Result<WordDetails, EnrichmentError> {
            self.calls.borrow_mut().push(word.to_string());
            if self.failing.contains(word) {
                Err(EnrichmentError::EmptyResponse(word.to_string()))
            } else {
                Ok(Self::details_for(word))
            }
        }
    }

    struct Fixture {
        _temp: TempDir,
        store: VocabularyStorage,
        frequency: FrequencyList,
    }

    fn fixture(top_words: &[&str]) -> Fixture {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("top_words.txt");
        fs::write(&cache, top_words.join("\n")).unwrap();

        Fixture {
            store: VocabularyStorage::new(Arc::new(Database::open_in_memory().unwrap())),
            frequency: FrequencyList::new(temp.path().join("missing.csv"), cache, 10_000),
            _temp: temp,
        }
    }

    #[test]
    fn test_add_from_dataset_skips_existing_words() {
        let fx = fixture(&["the", "of", "and", "to", "in"]);
        fx.store.create_entry("of", &NewEntry::default()).unwrap();
        fx.store.create_entry("to", &NewEntry::default()).unwrap();

        let gateway = FakeGateway::new();
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);
        let report = pipeline.add_from_dataset(5).unwrap();

        assert_eq!(report.added, vec!["the", "and", "in"]);
        assert_eq!(report.skipped_existing, 0);
        assert_eq!(fx.store.stats().unwrap().total, 5);
        assert_eq!(*gateway.calls.borrow(), vec!["the", "and", "in"]);

        let words: HashSet<String> = fx.store.existing_words().unwrap();
        assert_eq!(words.len(), 5);

        let the = fx.store.find_by_word("the").unwrap().unwrap();
        assert!(the.is_fully_enriched());
        assert_eq!(the.familiarity, 1);
        assert!(!the.learned);
    }

    #[test]
    fn test_enrichment_failure_skips_word_and_continues() {
        let fx = fixture(&["alpha", "beta", "gamma"]);
        let gateway = FakeGateway::failing_on(&["beta"]);
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);

        let report = pipeline.add_from_dataset(10).unwrap();

        assert_eq!(report.added, vec!["alpha", "gamma"]);
        assert_eq!(report.failed, vec!["beta"]);
        assert!(!fx.store.contains("beta").unwrap());
    }

    #[test]
    fn test_batch_is_capped() {
        let words: Vec<String> = (0..150u32)
            .map(|i| {
                // letters-only synthetic words: a..z pairs
                let a = (b'a' + (i / 26) as u8) as char;
                let b = (b'a' + (i % 26) as u8) as char;
                format!("w{}{}", a, b)
            })
            .collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let fx = fixture(&refs);
        let gateway = FakeGateway::new();
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);

        assert_eq!(pipeline.next_words(500).unwrap().len(), MAX_BATCH_SIZE);
        assert_eq!(pipeline.add_from_dataset(500).unwrap().added_count(), MAX_BATCH_SIZE);
    }

    #[test]
    fn test_unconfigured_gateway_is_rejected() {
        let fx = fixture(&["alpha"]);
        let gateway = FakeGateway {
            configured: false,
            ..FakeGateway::new()
        };
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);

        assert!(matches!(
            pipeline.add_from_dataset(1),
            Err(AcquisitionError::Configuration)
        ));
        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn test_rejected_credential_fails_once() {
        let fx = fixture(&["alpha", "beta", "gamma"]);
        let gateway = FakeGateway {
            accepted: false,
            ..FakeGateway::new()
        };
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);

        assert!(matches!(
            pipeline.add_from_dataset(3),
            Err(AcquisitionError::Configuration)
        ));
        assert!(matches!(
            pipeline.enrich_incomplete(None),
            Err(AcquisitionError::Configuration)
        ));
        assert_eq!(gateway.validations.get(), 2);
        assert!(gateway.calls.borrow().is_empty());
        assert!(fx.store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_abort_flag_stops_batch() {
        let fx = fixture(&["alpha", "beta"]);
        let gateway = FakeGateway::new();
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);

        pipeline.abort_handle().store(true, Ordering::Relaxed);
        let report = pipeline.add_from_dataset(2).unwrap();

        assert!(report.aborted);
        assert!(report.added.is_empty());
    }

    #[test]
    fn test_add_explicit_word_stores_text_verbatim() {
        let fx = fixture(&[]);
        let gateway = FakeGateway::new();
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);

        let id = pipeline
            .add_explicit_word(
                "Serendipity",
                NewEntry::user_supplied("What serendipity!".into(), "機緣".into(), String::new()),
            )
            .unwrap();

        let entry = fx.store.get(id).unwrap();
        assert_eq!(entry.word, "serendipity");
        assert_eq!(entry.example, "What serendipity!");
        assert_eq!(entry.translation_primary, "機緣");
        assert!(gateway.calls.borrow().is_empty());

        assert!(matches!(
            pipeline.add_explicit_word("serendipity", NewEntry::default()),
            Err(AcquisitionError::Storage(VocabularyStorageError::DuplicateWord(_)))
        ));
        assert!(matches!(
            pipeline.add_explicit_word("c3po", NewEntry::default()),
            Err(AcquisitionError::Storage(VocabularyStorageError::InvalidWord(_)))
        ));
    }

    #[test]
    fn test_enrich_incomplete_fills_gaps() {
        let fx = fixture(&[]);
        let id = fx
            .store
            .create_entry("lantern", &NewEntry::user_supplied("My own example.".into(), String::new(), String::new()))
            .unwrap();
        fx.store.create_entry("ember", &NewEntry::default()).unwrap();

        let gateway = FakeGateway::failing_on(&["ember"]);
        let pipeline = WordAcquisition::new(&fx.store, &fx.frequency, &gateway);
        let report = pipeline.enrich_incomplete(None).unwrap();

        assert_eq!(report.updated, vec!["lantern"]);
        assert_eq!(report.failed, vec!["ember"]);

        let entry = fx.store.get(id).unwrap();
        assert!(entry.is_fully_enriched());
        assert_eq!(entry.example, "This is lantern.");
        assert_eq!(
            fx.store.entries_for_mode(StudyMode::Learn, chrono::Utc::now().date_naive()).unwrap().len(),
            2
        );
    }

    #[test]
    fn test_missing_dataset_is_reported() {
        let temp = TempDir::new().unwrap();
        let store = VocabularyStorage::new(Arc::new(Database::open_in_memory().unwrap()));
        let frequency = FrequencyList::new(temp.path().join("none.csv"), temp.path().join("top.txt"), 10);
        let gateway = FakeGateway::new();
        let pipeline = WordAcquisition::new(&store, &frequency, &gateway);

        assert!(matches!(
            pipeline.add_from_dataset(3),
            Err(AcquisitionError::FrequencyList(FrequencyListError::DatasetMissing(_)))
        ));
    }
}
