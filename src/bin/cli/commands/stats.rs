use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.store.stats().context("Failed to read word counts")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint("Vocabulary", Color::BOLD, use_color));
            println!("  Total:     {}", stats.total);
            println!("  New:       {}", stats.unlearned);
            println!("  Learning:  {}", stats.learned_not_mastered);
            println!("  Mastered:  {}", paint(&stats.mastered.to_string(), Color::GREEN, use_color));
        }
    }

    Ok(())
}
