//! Settings storage in the `settings` table

use std::sync::Arc;

use rusqlite::{params, OptionalExtension};

use crate::database::{Database, DatabaseError};

/// Model used when none has been saved
pub const DEFAULT_API_MODEL: &str = "gemini-1.5-flash";

const API_KEY: &str = "api_key";
const API_MODEL: &str = "api_model";

/// Error type for settings operations
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Settings store sharing the vocabulary database session.
///
/// Writes take the session lock, so a reader never sees a half-written
/// credential/model pair.
#[derive(Clone)]
pub struct SettingsStore {
    db: Arc<Database>,
}

impl SettingsStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let conn = self.db.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let conn = self.db.lock()?;
        conn.execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Saved API key, if any (blank values count as absent)
    pub fn api_key(&self) -> Result<Option<String>, SettingsError> {
        Ok(self.get(API_KEY)?.filter(|k| !k.trim().is_empty()))
    }

    /// Saved model, or the default model
    pub fn api_model(&self) -> Result<String, SettingsError> {
        Ok(self
            .get(API_MODEL)?
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_MODEL.to_string()))
    }

    /// Key and model read under a single lock
    pub fn credentials(&self) -> Result<(Option<String>, String), SettingsError> {
        let conn = self.db.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings WHERE key IN (?1, ?2)")?;
        let rows = stmt
            .query_map(params![API_KEY, API_MODEL], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut key = None;
        let mut model = DEFAULT_API_MODEL.to_string();
        for (k, v) in rows {
            if v.trim().is_empty() {
                continue;
            }
            if k == API_KEY {
                key = Some(v);
            } else if k == API_MODEL {
                model = v;
            }
        }
        Ok((key, model))
    }

    pub fn save_api_key(&self, api_key: &str) -> Result<(), SettingsError> {
        self.set(API_KEY, api_key.trim())?;
        log::info!("API key saved");
        Ok(())
    }

    /// Save the model; a blank model saves the default
    pub fn save_api_model(&self, api_model: &str) -> Result<(), SettingsError> {
        let model = match api_model.trim() {
            "" => DEFAULT_API_MODEL,
            m => m,
        };
        self.set(API_MODEL, model)?;
        log::info!("API model saved: {}", model);
        Ok(())
    }

    pub fn clear_api_key(&self) -> Result<(), SettingsError> {
        self.remove(API_KEY)?;
        log::info!("API key cleared");
        Ok(())
    }

    pub fn clear_api_model(&self) -> Result<(), SettingsError> {
        self.remove(API_MODEL)?;
        log::info!("API model cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SettingsStore {
        SettingsStore::new(Arc::new(Database::open_in_memory().unwrap()))
    }

    #[test]
    fn test_defaults_when_empty() {
        let store = create_test_store();
        assert_eq!(store.api_key().unwrap(), None);
        assert_eq!(store.api_model().unwrap(), DEFAULT_API_MODEL);
    }

    #[test]
    fn test_save_and_clear() {
        let store = create_test_store();

        store.save_api_key("  secret-key ").unwrap();
        store.save_api_model("gemini-2.0-flash").unwrap();
        assert_eq!(store.api_key().unwrap().as_deref(), Some("secret-key"));
        assert_eq!(store.api_model().unwrap(), "gemini-2.0-flash");
        assert_eq!(
            store.credentials().unwrap(),
            (Some("secret-key".to_string()), "gemini-2.0-flash".to_string())
        );

        store.clear_api_key().unwrap();
        store.clear_api_model().unwrap();
        assert_eq!(store.api_key().unwrap(), None);
        assert_eq!(store.api_model().unwrap(), DEFAULT_API_MODEL);
    }

    #[test]
    fn test_blank_model_saves_default() {
        let store = create_test_store();
        store.save_api_model("   ").unwrap();
        assert_eq!(store.api_model().unwrap(), DEFAULT_API_MODEL);
    }
}
