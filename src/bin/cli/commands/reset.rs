use anyhow::{bail, Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, yes: bool, format: &OutputFormat) -> Result<()> {
    if !yes {
        bail!("Reset deletes every word and its review history. Pass --yes to confirm.");
    }

    let before = app.store.stats()?.total;
    app.store.reset().context("Failed to reset the vocabulary")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "deleted": before }))?);
        }
        OutputFormat::Plain => {
            println!("Deleted {} words", before);
        }
    }

    Ok(())
}
