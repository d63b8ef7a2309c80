use anyhow::{bail, Context, Result};

use lexideck_lib::vocabulary::{format_interval, Familiarity};

use crate::app::App;
use crate::OutputFormat;

pub fn run_mark(app: &App, word: &str, level: i32, format: &OutputFormat) -> Result<()> {
    let Some(familiarity) = Familiarity::from_level(level) else {
        bail!("Familiarity level must be 1 (unfamiliar), 3 (fuzzy) or 5 (familiar), got {}", level);
    };

    let entry = app.find_entry(word)?;
    let outcome = app
        .store
        .apply_review(entry.id, familiarity.level(), app.today())
        .with_context(|| format!("Failed to record review for '{}'", entry.word))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Plain => {
            println!(
                "{}: {} (next review {} in {})",
                entry.word,
                familiarity.label(),
                outcome.next_review.format("%Y-%m-%d"),
                format_interval(outcome.interval)
            );
        }
    }

    Ok(())
}

pub fn run_master(app: &App, word: &str, format: &OutputFormat) -> Result<()> {
    let entry = app.find_entry(word)?;
    app.store
        .mark_mastered(entry.id)
        .with_context(|| format!("Failed to mark '{}' as mastered", entry.word))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "word": entry.word,
                "mastered": true,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} marked as mastered", entry.word);
        }
    }

    Ok(())
}
