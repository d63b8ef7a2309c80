//! SQLite-backed word store
//!
//! One row per word in the `words` table. Dates are stored as ISO
//! `YYYY-MM-DD` text so they compare correctly as strings.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use thiserror::Error;

use super::algorithm::{calculate_next_review, latest_review_date, ReviewPolicy, ScheduleResult};
use super::models::*;
use crate::database::{Database, DatabaseError, WORDS_SCHEMA};

#[derive(Error, Debug)]
pub enum VocabularyStorageError {
    #[error("Invalid word '{0}': only letters a-z are allowed")]
    InvalidWord(String),

    #[error("Word already exists: {0}")]
    DuplicateWord(String),

    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, VocabularyStorageError>;

const ENTRY_COLUMNS: &str = "id, word, example, translation_primary, translation_secondary, \
     example_translation_primary, example_translation_secondary, part_of_speech, tense_info, \
     familiarity, last_reviewed, learned, mastered, interval, next_review";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.min(latest_review_date()).format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn row_to_entry(row: &Row) -> rusqlite::Result<VocabularyEntry> {
    let last_reviewed: Option<String> = row.get(10)?;
    let next_review: Option<String> = row.get(14)?;
    let interval: Option<i64> = row.get(13)?;

    Ok(VocabularyEntry {
        id: row.get(0)?,
        word: row.get(1)?,
        example: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        translation_primary: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        translation_secondary: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        example_translation_primary: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        example_translation_secondary: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        part_of_speech: row.get(7)?,
        tense_info: row.get(8)?,
        familiarity: row.get::<_, Option<i32>>(9)?.unwrap_or(1),
        last_reviewed: last_reviewed.as_deref().and_then(parse_date),
        learned: row.get::<_, Option<bool>>(11)?.unwrap_or(false),
        mastered: row.get::<_, Option<bool>>(12)?.unwrap_or(false),
        interval: interval.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32,
        next_review: next_review.as_deref().and_then(parse_date),
    })
}

/// Storage manager for vocabulary entries
pub struct VocabularyStorage {
    db: Arc<Database>,
    policy: ReviewPolicy,
}

impl VocabularyStorage {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            policy: ReviewPolicy::default(),
        }
    }

    pub fn with_policy(db: Arc<Database>, policy: ReviewPolicy) -> Self {
        Self { db, policy }
    }

    fn normalize(word: &str) -> Result<String> {
        normalize_word(word).ok_or_else(|| VocabularyStorageError::InvalidWord(word.trim().to_string()))
    }

    // ==================== Entry Operations ====================

    /// Create a new entry. The word is trimmed and lowercased first.
    pub fn create_entry(&self, word: &str, fields: &NewEntry) -> Result<EntryId> {
        let word = Self::normalize(word)?;
        let conn = self.db.lock()?;

        if word_exists(&conn, &word)? {
            return Err(VocabularyStorageError::DuplicateWord(word));
        }

        conn.execute(
            "INSERT INTO words (word, example, translation_primary, translation_secondary, \
             example_translation_primary, example_translation_secondary, part_of_speech, tense_info, \
             familiarity, learned, mastered, interval) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, 0, 0, 1)",
            params![
                word,
                fields.example,
                fields.translation_primary,
                fields.translation_secondary,
                fields.example_translation_primary,
                fields.example_translation_secondary,
                fields.part_of_speech,
                fields.tense_info,
            ],
        )?;

        let id = conn.last_insert_rowid();
        log::info!("Added word '{}' as entry {}", word, id);
        Ok(id)
    }

    /// Insert an entry carried over from an export, keeping its scheduling state.
    ///
    /// The stored id is newly assigned. `mastered` forces `learned`.
    pub fn insert_imported(&self, entry: &VocabularyEntry) -> Result<EntryId> {
        let word = Self::normalize(&entry.word)?;
        let conn = self.db.lock()?;

        if word_exists(&conn, &word)? {
            return Err(VocabularyStorageError::DuplicateWord(word));
        }

        conn.execute(
            &format!(
                "INSERT INTO words ({}) VALUES (NULL, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                ENTRY_COLUMNS
            ),
            params![
                word,
                entry.example,
                entry.translation_primary,
                entry.translation_secondary,
                entry.example_translation_primary,
                entry.example_translation_secondary,
                entry.part_of_speech,
                entry.tense_info,
                entry.familiarity,
                entry.last_reviewed.map(format_date),
                entry.learned || entry.mastered,
                entry.mastered,
                i64::from(entry.interval.max(1)),
                entry.next_review.map(format_date),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a specific entry
    pub fn get(&self, id: EntryId) -> Result<VocabularyEntry> {
        let conn = self.db.lock()?;
        conn.query_row(
            &format!("SELECT {} FROM words WHERE id = ?1", ENTRY_COLUMNS),
            params![id],
            row_to_entry,
        )
        .optional()?
        .ok_or(VocabularyStorageError::NotFound(id))
    }

    /// Look up an entry by word (normalized before matching)
    pub fn find_by_word(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        let word = Self::normalize(word)?;
        let conn = self.db.lock()?;
        let entry = conn
            .query_row(
                &format!("SELECT {} FROM words WHERE word = ?1", ENTRY_COLUMNS),
                params![word],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn contains(&self, word: &str) -> Result<bool> {
        match normalize_word(word) {
            Some(word) => {
                let conn = self.db.lock()?;
                Ok(word_exists(&conn, &word)?)
            }
            None => Ok(false),
        }
    }

    /// Every stored word, for set difference against candidate lists
    pub fn existing_words(&self) -> Result<HashSet<String>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare("SELECT word FROM words")?;
        let words = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(words)
    }

    /// All entries in insertion order
    pub fn list_all(&self) -> Result<Vec<VocabularyEntry>> {
        self.query_entries(&format!("SELECT {} FROM words ORDER BY id", ENTRY_COLUMNS), [])
    }

    /// Entries missing at least one enrichment field
    pub fn incomplete_entries(&self) -> Result<Vec<VocabularyEntry>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|e| !e.is_fully_enriched())
            .collect())
    }

    /// Entries belonging to a study mode, in insertion order
    pub fn entries_for_mode(&self, mode: StudyMode, today: NaiveDate) -> Result<Vec<VocabularyEntry>> {
        let entries = match mode {
            StudyMode::Learn => self.query_entries(
                &format!("SELECT {} FROM words WHERE learned = 0 ORDER BY id", ENTRY_COLUMNS),
                [],
            )?,
            StudyMode::Review => {
                let today = format_date(today);
                self.query_entries(
                    &format!(
                        "SELECT {} FROM words WHERE learned = 1 AND mastered = 0 \
                         AND next_review IS NOT NULL AND next_review <= ?1 ORDER BY id",
                        ENTRY_COLUMNS
                    ),
                    params![today],
                )?
            }
            StudyMode::Mastered => self.query_entries(
                &format!("SELECT {} FROM words WHERE mastered = 1 ORDER BY id", ENTRY_COLUMNS),
                [],
            )?,
        };

        if entries.is_empty() {
            log::warn!("No words found for mode {}", mode);
        } else {
            log::info!("Loaded {} words for mode {}", entries.len(), mode);
        }

        Ok(entries)
    }

    fn query_entries<P: rusqlite::Params>(&self, sql: &str, args: P) -> Result<Vec<VocabularyEntry>> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let entries = stmt
            .query_map(args, row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Overwrite the enrichment fields of an entry
    pub fn update_enrichment(&self, id: EntryId, details: &WordDetails) -> Result<()> {
        let conn = self.db.lock()?;
        let changed = conn.execute(
            "UPDATE words SET example = ?1, translation_primary = ?2, translation_secondary = ?3, \
             example_translation_primary = ?4, example_translation_secondary = ?5, \
             part_of_speech = ?6, tense_info = ?7 WHERE id = ?8",
            params![
                details.example,
                details.translation_primary,
                details.translation_secondary,
                details.example_translation_primary,
                details.example_translation_secondary,
                Some(&details.part_of_speech).filter(|s| !s.is_empty()),
                Some(&details.tense_info).filter(|s| !s.is_empty()),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(VocabularyStorageError::NotFound(id));
        }
        Ok(())
    }

    // ==================== Review Operations ====================

    /// Record a familiarity mark and reschedule the entry
    pub fn apply_review(&self, id: EntryId, level: i32, today: NaiveDate) -> Result<ReviewOutcome> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;

        let current: Option<i64> = tx
            .query_row("SELECT interval FROM words WHERE id = ?1", params![id], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .optional()?
            .ok_or(VocabularyStorageError::NotFound(id))?;
        let current = current.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;

        let ScheduleResult {
            interval,
            next_review,
        } = calculate_next_review(current, level, today, &self.policy);

        tx.execute(
            "UPDATE words SET familiarity = ?1, last_reviewed = ?2, interval = ?3, \
             next_review = ?4, learned = 1 WHERE id = ?5",
            params![
                level,
                format_date(today),
                i64::from(interval),
                format_date(next_review),
                id
            ],
        )?;
        tx.commit()?;

        log::info!(
            "Marked entry {} with familiarity {}, next review: {}",
            id,
            level,
            next_review
        );

        Ok(ReviewOutcome {
            familiarity: level,
            interval,
            next_review,
        })
    }

    /// Mark an entry as mastered (also learned)
    pub fn mark_mastered(&self, id: EntryId) -> Result<()> {
        let conn = self.db.lock()?;
        let changed = conn.execute(
            "UPDATE words SET mastered = 1, learned = 1 WHERE id = ?1",
            params![id],
        )?;
        if changed == 0 {
            return Err(VocabularyStorageError::NotFound(id));
        }
        log::info!("Marked entry {} as mastered", id);
        Ok(())
    }

    /// Drop every entry and recreate the empty table
    pub fn reset(&self) -> Result<()> {
        let mut conn = self.db.lock()?;
        let tx = conn.transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS words;")?;
        tx.execute_batch(WORDS_SCHEMA)?;
        tx.commit()?;

        log::info!("Words table reset");
        Ok(())
    }

    /// Counts by learning state
    pub fn stats(&self) -> Result<VocabularyStats> {
        let conn = self.db.lock()?;
        let (total, unlearned, learned_not_mastered, mastered): (i64, i64, i64, i64) = conn.query_row(
            "SELECT COUNT(*), \
             COALESCE(SUM(CASE WHEN learned = 0 THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN learned = 1 AND mastered = 0 THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(CASE WHEN mastered = 1 THEN 1 ELSE 0 END), 0) \
             FROM words",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        let stats = VocabularyStats {
            total: total as usize,
            unlearned: unlearned as usize,
            learned_not_mastered: learned_not_mastered as usize,
            mastered: mastered as usize,
        };

        log::info!(
            "Vocabulary stats: total={}, unlearned={}, learned_not_mastered={}, mastered={}",
            stats.total,
            stats.unlearned,
            stats.learned_not_mastered,
            stats.mastered
        );
        Ok(stats)
    }
}

fn word_exists(conn: &rusqlite::Connection, word: &str) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM words WHERE word = ?1",
        params![word],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
