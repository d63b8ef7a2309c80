//! SQLite session shared by the word store and the settings store.
//!
//! A single connection lives behind a mutex; every mutation holds the lock
//! for its full duration, so writes are serialized.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, DatabaseError>;

/// DDL for the words table and its indexes. Also used by `reset`.
pub(crate) const WORDS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS words (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word TEXT UNIQUE NOT NULL,
        example TEXT,
        translation_primary TEXT,
        translation_secondary TEXT,
        example_translation_primary TEXT,
        example_translation_secondary TEXT,
        part_of_speech TEXT,
        tense_info TEXT,
        familiarity INTEGER DEFAULT 1,
        last_reviewed TEXT,
        learned INTEGER DEFAULT 0,
        mastered INTEGER DEFAULT 0,
        interval INTEGER DEFAULT 1,
        next_review TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_words_learned ON words(learned);
    CREATE INDEX IF NOT EXISTS idx_words_mastered ON words(mastered);
    CREATE INDEX IF NOT EXISTS idx_words_next_review ON words(next_review);
"#;

const SETTINGS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;

/// Owned storage session. Wrap in an `Arc` and hand it to each component.
pub struct Database {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        };
        db.init_schema()?;

        log::info!("Opened vocabulary database at {:?}", path);
        Ok(db)
    }

    /// In-memory database, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            path: None,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(WORDS_SCHEMA)?;
        conn.execute_batch(SETTINGS_SCHEMA)?;
        Ok(())
    }

    /// Acquire the connection. Hold the guard for the whole mutation.
    pub fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }

    /// Path of the backing file, `None` for in-memory sessions.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
