use anyhow::{Context, Result};

use lexideck_lib::acquisition::{WordAcquisition, MAX_BATCH_SIZE};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    count: Option<usize>,
    rebuild: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let gateway = app.gateway()?;
    let frequency = app.config.frequency_list();
    if rebuild {
        log::info!(
            "Rebuilding {:?} from {:?}",
            frequency.cache_path(),
            frequency.dataset_path()
        );
        frequency.invalidate().context("Failed to remove the cached top-words list")?;
    }
    let acquisition = WordAcquisition::new(&app.store, &frequency, &gateway);

    let count = count.unwrap_or(app.config.default_batch_size);
    if count > MAX_BATCH_SIZE {
        log::warn!("Batch of {} requested, adding at most {}", count, MAX_BATCH_SIZE);
    }

    let report = acquisition
        .add_from_dataset(count)
        .context("Failed to add words from the frequency list")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            println!("Added {} words", paint(&report.added_count().to_string(), Color::BOLD, use_color));
            for word in &report.added {
                println!("  + {}", word);
            }
            if !report.failed.is_empty() {
                println!(
                    "{}",
                    paint(
                        &format!("Skipped {} words after enrichment failed: {}", report.failed.len(), report.failed.join(", ")),
                        Color::YELLOW,
                        use_color
                    )
                );
            }
            if report.skipped_existing > 0 {
                println!("Skipped {} words already stored", report.skipped_existing);
            }
        }
    }

    Ok(())
}

pub fn run_enrich(app: &App, limit: Option<usize>, format: &OutputFormat) -> Result<()> {
    let gateway = app.gateway()?;
    let frequency = app.config.frequency_list();
    let acquisition = WordAcquisition::new(&app.store, &frequency, &gateway);

    let report = acquisition
        .enrich_incomplete(limit)
        .context("Failed to enrich words")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Plain => {
            println!("Updated {} words", report.updated.len());
            if !report.failed.is_empty() {
                println!("Still missing details: {}", report.failed.join(", "));
            }
        }
    }

    Ok(())
}
