use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use super::{Result, COLUMNS};
use crate::vocabulary::{VocabularyEntry, VocabularyStorage};

fn date_field(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Write entries as CSV with a header row
pub fn write_entries<W: Write>(entries: &[VocabularyEntry], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;

    for entry in entries {
        csv_writer.write_record([
            entry.id.to_string().as_str(),
            &entry.word,
            &entry.example,
            &entry.translation_primary,
            &entry.translation_secondary,
            &entry.example_translation_primary,
            &entry.example_translation_secondary,
            entry.part_of_speech.as_deref().unwrap_or_default(),
            entry.tense_info.as_deref().unwrap_or_default(),
            entry.familiarity.to_string().as_str(),
            &date_field(entry.last_reviewed),
            flag(entry.learned),
            flag(entry.mastered),
            entry.interval.to_string().as_str(),
            &date_field(entry.next_review),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export every entry to `path`, returning the number of rows written
pub fn export_csv(store: &VocabularyStorage, path: &Path) -> Result<usize> {
    let entries = store.list_all()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_entries(&entries, file)?;

    log::info!("Exported {} words to {:?}", entries.len(), path);
    Ok(entries.len())
}
