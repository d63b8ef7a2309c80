use anyhow::{Context, Result};

use lexideck_lib::vocabulary::StudyMode;

use crate::app::App;
use crate::render::terminal::{self, paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, mode: StudyMode, format: &OutputFormat, use_color: bool) -> Result<()> {
    let today = app.today();
    let entries = app
        .store
        .entries_for_mode(mode, today)
        .with_context(|| format!("Failed to list {} words", mode))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Plain => {
            if entries.is_empty() {
                println!("No words to {}.", mode);
                return Ok(());
            }

            let word_width = entries.iter().map(|e| e.word.len()).max().unwrap_or(4).clamp(4, 24);
            let status_width = 16;

            println!("{:<ww$} {:<sw$} {}", "Word", "Status", "Translation", ww = word_width, sw = status_width);
            println!(
                "{} {} {}",
                "\u{2500}".repeat(word_width),
                "\u{2500}".repeat(status_width),
                "\u{2500}".repeat(20)
            );

            for entry in &entries {
                let translation = if entry.translation_primary.is_empty() {
                    paint("(not enriched)", Color::DIM, use_color)
                } else {
                    entry.translation_primary.clone()
                };

                println!(
                    "{:<ww$} {:<sw$} {}",
                    entry.word,
                    terminal::status(entry, today),
                    translation,
                    ww = word_width,
                    sw = status_width
                );
            }

            println!("\n{} words total", entries.len());
        }
    }

    Ok(())
}
