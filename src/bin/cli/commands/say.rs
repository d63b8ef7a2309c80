use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, word: &str, format: &OutputFormat) -> Result<()> {
    let pronouncer = app.pronouncer()?;
    let cached = pronouncer.is_cached(word);
    let path = pronouncer
        .ensure_audio(word)
        .with_context(|| format!("Failed to get pronunciation for '{}'", word.trim()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "path": path.to_string_lossy(),
                "cached": cached,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
