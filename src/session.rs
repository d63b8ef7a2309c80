//! A pass through the entries of one study mode

use chrono::NaiveDate;

use crate::enrichment::EnrichmentGateway;
use crate::vocabulary::storage::Result;
use crate::vocabulary::{ReviewOutcome, StudyMode, VocabularyEntry, VocabularyStorage};

/// Walks the entries selected for a mode, in id order.
///
/// The entry list is a snapshot taken when the session starts; marks are
/// written through to the store as they happen.
pub struct StudySession<'a> {
    store: &'a VocabularyStorage,
    mode: StudyMode,
    entries: Vec<VocabularyEntry>,
    position: usize,
    reviewed: usize,
}

impl<'a> StudySession<'a> {
    pub fn new(store: &'a VocabularyStorage, mode: StudyMode, today: NaiveDate) -> Result<Self> {
        let entries = store.entries_for_mode(mode, today)?;
        log::debug!("Starting {} session with {} entries", mode, entries.len());

        Ok(Self {
            store,
            mode,
            entries,
            position: 0,
            reviewed: 0,
        })
    }

    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(position, total)`, with the position counted from 1
    pub fn progress(&self) -> (usize, usize) {
        ((self.position + 1).min(self.entries.len()), self.entries.len())
    }

    /// Entries marked or mastered so far
    pub fn reviewed(&self) -> usize {
        self.reviewed
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.entries.len()
    }

    pub fn current(&self) -> Option<&VocabularyEntry> {
        self.entries.get(self.position)
    }

    /// Fill in missing enrichment for the current entry.
    ///
    /// Returns true when new details were stored. A blank response leaves the
    /// entry untouched so a later pass can retry it.
    pub fn ensure_enriched<G: EnrichmentGateway + ?Sized>(&mut self, gateway: &G) -> Result<bool> {
        let Some(entry) = self.entries.get_mut(self.position) else {
            return Ok(false);
        };
        if entry.is_fully_enriched() || !gateway.is_configured() {
            return Ok(false);
        }

        let fetched = gateway.fetch_details(&entry.word);
        if fetched.is_blank() {
            log::warn!("No details returned for {}, leaving entry as is", entry.word);
            return Ok(false);
        }

        let merged = fetched.or_else(entry.details());
        self.store.update_enrichment(entry.id, &merged)?;
        entry.apply_details(merged);
        Ok(true)
    }

    /// Record a familiarity level for the current entry and move on.
    pub fn mark(&mut self, level: i32, today: NaiveDate) -> Result<Option<ReviewOutcome>> {
        let Some(entry) = self.entries.get_mut(self.position) else {
            return Ok(None);
        };

        let outcome = self.store.apply_review(entry.id, level, today)?;
        entry.familiarity = outcome.familiarity;
        entry.interval = outcome.interval;
        entry.next_review = Some(outcome.next_review);
        entry.last_reviewed = Some(today);
        entry.learned = true;

        self.position += 1;
        self.reviewed += 1;
        Ok(Some(outcome))
    }

    /// Mark the current entry mastered and move on.
    pub fn master(&mut self) -> Result<bool> {
        let Some(entry) = self.entries.get_mut(self.position) else {
            return Ok(false);
        };

        self.store.mark_mastered(entry.id)?;
        entry.mastered = true;
        entry.learned = true;

        self.position += 1;
        self.reviewed += 1;
        Ok(true)
    }

    /// Move to the next entry without touching the current one.
    pub fn skip(&mut self) {
        if !self.is_finished() {
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::tests::FakeGateway;
    use crate::database::Database;
    use crate::vocabulary::NewEntry;
    use std::sync::Arc;

    fn create_test_storage() -> VocabularyStorage {
        VocabularyStorage::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_learn_session_walks_and_marks() {
        let store = create_test_storage();
        store.create_entry("alpha", &NewEntry::default()).unwrap();
        store.create_entry("beta", &NewEntry::default()).unwrap();

        let mut session = StudySession::new(&store, StudyMode::Learn, today()).unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.progress(), (1, 2));
        assert_eq!(session.current().unwrap().word, "alpha");

        let outcome = session.mark(5, today()).unwrap().unwrap();
        assert_eq!(outcome.interval, 2);
        assert_eq!(session.current().unwrap().word, "beta");

        session.skip();
        assert!(session.is_finished());
        assert!(session.current().is_none());
        assert!(session.mark(3, today()).unwrap().is_none());
        assert_eq!(session.reviewed(), 1);

        let remaining = store.entries_for_mode(StudyMode::Learn, today()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].word, "beta");
    }

    #[test]
    fn test_master_moves_entry_to_mastered() {
        let store = create_test_storage();
        store.create_entry("gamma", &NewEntry::default()).unwrap();

        let mut session = StudySession::new(&store, StudyMode::Learn, today()).unwrap();
        assert!(session.master().unwrap());
        assert!(session.is_finished());
        assert!(!session.master().unwrap());

        let mastered = store.entries_for_mode(StudyMode::Mastered, today()).unwrap();
        assert_eq!(mastered.len(), 1);
        assert!(mastered[0].learned);
    }

    #[test]
    fn test_ensure_enriched_fills_missing_fields() {
        let store = create_test_storage();
        let id = store
            .create_entry(
                "delta",
                &NewEntry::user_supplied("My own example.".to_string(), String::new(), String::new()),
            )
            .unwrap();

        let gateway = FakeGateway::new();
        let mut session = StudySession::new(&store, StudyMode::Learn, today()).unwrap();
        assert!(session.ensure_enriched(&gateway).unwrap());

        let stored = store.get(id).unwrap();
        assert!(stored.is_fully_enriched());
        assert_eq!(stored.example, "This is delta.");
        assert_eq!(session.current().unwrap(), &stored);

        // Already complete, so no second call
        assert!(!session.ensure_enriched(&gateway).unwrap());
        assert_eq!(gateway.calls.borrow().len(), 1);
    }

    #[test]
    fn test_failed_enrichment_leaves_entry_untouched() {
        let store = create_test_storage();
        let id = store.create_entry("epsilon", &NewEntry::default()).unwrap();
        let before = store.get(id).unwrap();

        let gateway = FakeGateway::failing_on(&["epsilon"]);
        let mut session = StudySession::new(&store, StudyMode::Learn, today()).unwrap();
        assert!(!session.ensure_enriched(&gateway).unwrap());
        assert_eq!(store.get(id).unwrap(), before);
    }

    #[test]
    fn test_unconfigured_gateway_is_not_called() {
        let store = create_test_storage();
        store.create_entry("zeta", &NewEntry::default()).unwrap();

        let gateway = FakeGateway {
            configured: false,
            ..FakeGateway::new()
        };
        let mut session = StudySession::new(&store, StudyMode::Learn, today()).unwrap();
        assert!(!session.ensure_enriched(&gateway).unwrap());
        assert!(gateway.calls.borrow().is_empty());
    }

    #[test]
    fn test_empty_review_session() {
        let store = create_test_storage();
        store.create_entry("eta", &NewEntry::default()).unwrap();

        let session = StudySession::new(&store, StudyMode::Review, today()).unwrap();
        assert!(session.is_empty());
        assert!(session.is_finished());
        assert_eq!(session.progress(), (0, 0));
    }
}
