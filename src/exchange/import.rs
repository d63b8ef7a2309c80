use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::{ExchangeError, Result, COLUMNS};
use crate::vocabulary::storage::parse_date;
use crate::vocabulary::{normalize_word, VocabularyEntry, VocabularyStorage, VocabularyStorageError};

/// Counts from an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: usize,
    pub skipped_short: usize,
    pub skipped_invalid: usize,
    pub skipped_existing: usize,
}

/// Rows parsed from an export. `None` marks a row with too few columns.
pub fn read_entries<R: Read>(reader: R) -> Result<Vec<Option<VocabularyEntry>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.len() < COLUMNS.len() {
            rows.push(None);
            continue;
        }

        let text = |i: usize| record.get(i).unwrap_or_default().to_string();
        let optional = |i: usize| Some(text(i)).filter(|s| !s.is_empty());
        let int = |i: usize, default: i64| record.get(i).and_then(|v| v.trim().parse::<i64>().ok()).unwrap_or(default);
        let date = |i: usize| record.get(i).and_then(parse_date);

        let mut entry = VocabularyEntry::new(int(0, 0), record.get(1).unwrap_or_default().trim().to_string());
        entry.example = text(2);
        entry.translation_primary = text(3);
        entry.translation_secondary = text(4);
        entry.example_translation_primary = text(5);
        entry.example_translation_secondary = text(6);
        entry.part_of_speech = optional(7);
        entry.tense_info = optional(8);
        entry.familiarity = i32::try_from(int(9, 1)).unwrap_or(1);
        entry.last_reviewed = date(10);
        entry.learned = int(11, 0) != 0;
        entry.mastered = int(12, 0) != 0;
        entry.interval = int(13, 1).clamp(1, i64::from(u32::MAX)) as u32;
        entry.next_review = date(14);

        rows.push(Some(entry));
    }

    Ok(rows)
}

/// Import an export file, skipping short rows, invalid words and words
/// already in the store
pub fn import_csv(store: &VocabularyStorage, path: &Path) -> Result<ImportReport> {
    if !path.exists() {
        log::warn!("Import file {:?} does not exist", path);
        return Err(ExchangeError::FileMissing(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)?;
    let mut report = ImportReport::default();

    for row in read_entries(file)? {
        let Some(entry) = row else {
            report.skipped_short += 1;
            continue;
        };

        if normalize_word(&entry.word).is_none() {
            log::warn!("Invalid word: {}, skipping", entry.word);
            report.skipped_invalid += 1;
            continue;
        }

        match store.insert_imported(&entry) {
            Ok(_) => report.imported += 1,
            Err(VocabularyStorageError::DuplicateWord(word)) => {
                log::warn!("Word {} already exists, skipping", word);
                report.skipped_existing += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    log::info!("Imported {} words from {:?}", report.imported, path);
    Ok(report)
}
