use anyhow::{Context, Result};

use lexideck_lib::enrichment::EnrichmentGateway;

use crate::app::App;
use crate::OutputFormat;

/// Show only the last few characters of a key
fn mask(key: &str) -> String {
    let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("****{}", tail)
}

pub fn run_show(app: &App, format: &OutputFormat) -> Result<()> {
    let (api_key, model) = app.settings.credentials().context("Failed to read settings")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "apiKeySet": api_key.is_some(),
                "apiModel": model,
                "dataDir": app.config.data_dir().to_string_lossy(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("API key:  {}", api_key.as_deref().map(mask).unwrap_or_else(|| "(not set)".to_string()));
            println!("Model:    {}", model);
            println!("Data dir: {}", app.config.data_dir().display());
        }
    }

    Ok(())
}

pub fn run_set_key(app: &App, key: &str) -> Result<()> {
    app.settings.save_api_key(key.trim()).context("Failed to save API key")?;
    println!("API key saved");
    Ok(())
}

pub fn run_set_model(app: &App, model: &str) -> Result<()> {
    app.settings.save_api_model(model.trim()).context("Failed to save model")?;
    println!("Model set to {}", app.settings.api_model()?);
    Ok(())
}

pub fn run_clear(app: &App) -> Result<()> {
    app.settings.clear_api_key()?;
    app.settings.clear_api_model()?;
    println!("Settings cleared");
    Ok(())
}

pub fn run_validate(app: &App, format: &OutputFormat) -> Result<()> {
    let gateway = app.gateway()?;
    let configured = gateway.is_configured();
    let valid = configured && gateway.validate().context("Failed to validate API key")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "configured": configured,
                "valid": valid,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if !configured {
                println!("No API key set. Use `settings set-key <KEY>`.");
            } else if valid {
                println!("API key is valid");
            } else {
                println!("API key was rejected; check the key and model");
            }
        }
    }

    Ok(())
}
