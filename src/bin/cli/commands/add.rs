use anyhow::{Context, Result};

use lexideck_lib::acquisition::WordAcquisition;
use lexideck_lib::vocabulary::NewEntry;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    word: &str,
    example: Option<String>,
    translation: Option<String>,
    secondary: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let gateway = app.gateway()?;
    let frequency = app.config.frequency_list();
    let acquisition = WordAcquisition::new(&app.store, &frequency, &gateway);

    let fields = NewEntry::user_supplied(
        example.unwrap_or_default(),
        translation.unwrap_or_default(),
        secondary.unwrap_or_default(),
    );
    let id = acquisition
        .add_explicit_word(word, fields)
        .with_context(|| format!("Failed to add '{}'", word.trim()))?;
    let entry = app.store.get(id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Plain => {
            println!("Added \"{}\"", entry.word);
            if !entry.is_fully_enriched() {
                println!("  Missing details are filled in when the word is studied, or with `enrich`.");
            }
        }
    }

    Ok(())
}
