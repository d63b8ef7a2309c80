//! CSV export and import of the whole vocabulary
//!
//! Fifteen columns in entry field order, with a header row. Booleans are
//! written as `0`/`1` and dates as `YYYY-MM-DD`.

mod export;
mod import;

use std::path::PathBuf;

use thiserror::Error;

use crate::vocabulary::VocabularyStorageError;

pub use export::{export_csv, write_entries};
pub use import::{import_csv, read_entries, ImportReport};

/// Column names, in the order of the exported fields
pub const COLUMNS: [&str; 15] = [
    "id",
    "word",
    "example",
    "translation_primary",
    "translation_secondary",
    "example_translation_primary",
    "example_translation_secondary",
    "part_of_speech",
    "tense_info",
    "familiarity",
    "last_reviewed",
    "learned",
    "mastered",
    "interval",
    "next_review",
];

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Import file not found: {0}")]
    FileMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Storage(#[from] VocabularyStorageError),
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::vocabulary::{NewEntry, VocabularyEntry, VocabularyStorage, WordDetails};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn storage() -> VocabularyStorage {
        VocabularyStorage::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    /// Everything except the id, keyed by word
    fn snapshot(store: &VocabularyStorage) -> HashMap<String, VocabularyEntry> {
        store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|mut e| {
                e.id = 0;
                (e.word.clone(), e)
            })
            .collect()
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vocabulary_export.csv");
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let source = storage();
        source.create_entry("plain", &NewEntry::default()).unwrap();
        let rich = source
            .create_entry(
                "quote",
                &NewEntry::from_details(WordDetails {
                    example: "He said, \"hello, there\".".to_string(),
                    translation_primary: "引用".to_string(),
                    translation_secondary: "引用".to_string(),
                    example_translation_primary: "他說：「你好」。".to_string(),
                    example_translation_secondary: "彼は\n「こんにちは」と言った。".to_string(),
                    part_of_speech: "noun, verb".to_string(),
                    tense_info: "quoted".to_string(),
                }),
            )
            .unwrap();
        let done = source.create_entry("done", &NewEntry::default()).unwrap();
        source.apply_review(rich, 5, today).unwrap();
        source.apply_review(rich, 3, today).unwrap();
        source.apply_review(done, 1, today).unwrap();
        source.mark_mastered(done).unwrap();

        assert_eq!(export_csv(&source, &path).unwrap(), 3);

        let target = storage();
        let report = import_csv(&target, &path).unwrap();
        assert_eq!(report.imported, 3);
        assert_eq!(snapshot(&source), snapshot(&target));
    }

    #[test]
    fn test_import_skips_bad_rows() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("in.csv");
        std::fs::write(
            &path,
            format!(
                "{}\n\
                 1,apple,,,,,,,,,,,,,\n\
                 2,short,row\n\
                 3,b4d,,,,,,,,,,,,,\n\
                 4,Apple,,,,,,,,,,,,,\n\
                 5,pear,ex,zh,ja,zhex,jaex,noun,pears,x,2024-01-01,1,0,,2024-01-03\n\
                 6,plum,,,,,,,,4294967301,,,,,\n",
                COLUMNS.join(",")
            ),
        )
        .unwrap();

        let store = storage();
        store.create_entry("banana", &NewEntry::default()).unwrap();

        let report = import_csv(&store, &path).unwrap();
        assert_eq!(
            report,
            ImportReport {
                imported: 3,
                skipped_short: 1,
                skipped_invalid: 1,
                skipped_existing: 1,
            }
        );

        let apple = store.find_by_word("apple").unwrap().unwrap();
        assert_eq!(apple.familiarity, 1);
        assert_eq!(apple.interval, 1);
        assert!(!apple.learned);
        assert!(!apple.mastered);
        assert_eq!(apple.part_of_speech, None);

        let pear = store.find_by_word("pear").unwrap().unwrap();
        assert_eq!(pear.familiarity, 1);
        assert_eq!(pear.interval, 1);
        assert!(pear.learned);
        assert_eq!(pear.part_of_speech.as_deref(), Some("noun"));
        assert_eq!(pear.next_review, NaiveDate::from_ymd_opt(2024, 1, 3));

        // Out of range for a familiarity level, so the default applies
        let plum = store.find_by_word("plum").unwrap().unwrap();
        assert_eq!(plum.familiarity, 1);
    }

    #[test]
    fn test_import_missing_file() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            import_csv(&storage(), &temp.path().join("nope.csv")),
            Err(ExchangeError::FileMissing(_))
        ));
    }
}
