//! Vocabulary flashcards with spaced repetition.
//!
//! Words are drawn from a frequency list, enriched with translations and
//! example sentences by a generative-language service, stored in SQLite and
//! scheduled for review with an interval-doubling policy.

pub mod acquisition;
pub mod config;
pub mod database;
pub mod enrichment;
pub mod exchange;
pub mod frequency;
pub mod navigation;
pub mod pronunciation;
pub mod session;
pub mod settings;
pub mod vocabulary;
