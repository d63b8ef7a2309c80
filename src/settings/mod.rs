//! Process-wide key/value settings (API credential and model)

mod storage;

pub use storage::{SettingsError, SettingsStore, DEFAULT_API_MODEL};
