use std::path::PathBuf;

use anyhow::{Context, Result};

use lexideck_lib::exchange;

use crate::app::App;
use crate::OutputFormat;

pub fn run_export(app: &App, path: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let path = path.unwrap_or_else(|| app.config.export_path());
    let count = exchange::export_csv(&app.store, &path)
        .with_context(|| format!("Failed to export to {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "exported": count,
                "path": path.to_string_lossy(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Exported {} words to {}", count, path.display());
        }
    }

    Ok(())
}

pub fn run_import(app: &App, path: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let path = path.unwrap_or_else(|| app.config.export_path());
    let report = exchange::import_csv(&app.store, &path)
        .with_context(|| format!("Failed to import from {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            println!("Imported {} words from {}", report.imported, path.display());
            if report.skipped_existing > 0 {
                println!("  {} already stored", report.skipped_existing);
            }
            if report.skipped_invalid > 0 {
                println!("  {} invalid words", report.skipped_invalid);
            }
            if report.skipped_short > 0 {
                println!("  {} incomplete rows", report.skipped_short);
            }
        }
    }

    Ok(())
}
