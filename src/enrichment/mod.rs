//! Enrichment of vocabulary entries from a generative-language service

pub mod gateway;
pub mod gemini;

pub use gateway::{
    build_prompt, parse_details, EnrichmentError, EnrichmentGateway, TranslationLanguages,
};
pub use gemini::{GeminiGateway, GeminiOptions};
