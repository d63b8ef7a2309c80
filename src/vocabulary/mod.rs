//! Vocabulary store and review scheduling
//!
//! This module provides:
//! - Vocabulary entries with enrichment fields and review metadata
//! - Word validation (letters only, stored lowercase)
//! - Interval-doubling review scheduler
//! - SQLite-backed storage with study-mode queries and stats

pub mod algorithm;
pub mod models;
pub mod storage;

pub use algorithm::{calculate_next_review, format_interval, latest_review_date, Familiarity, ReviewPolicy, ScheduleResult};
pub use models::*;
pub use storage::{VocabularyStorage, VocabularyStorageError};
