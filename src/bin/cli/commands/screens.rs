use anyhow::Result;

use lexideck_lib::navigation::Screen;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    screen: Option<Screen>,
    validate: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let readiness = app.readiness(validate)?;
    let screens: Vec<Screen> = match screen {
        Some(screen) => vec![screen],
        None => Screen::ALL.to_vec(),
    };

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = screens
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "screen": s,
                        "title": s.title(),
                        "studyMode": s.study_mode(),
                        "resolvesTo": Screen::resolve(*s, readiness),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for s in &screens {
                let target = Screen::resolve(*s, readiness);
                let redirect = if target != *s {
                    paint(&format!(" -> {}", target), Color::YELLOW, use_color)
                } else {
                    String::new()
                };
                println!("{:<10} {}{}", s.as_str(), s.description(), redirect);
            }
            if !readiness.is_ready() {
                println!("\nSet a valid API key with `settings set-key` to unlock study screens.");
            }
        }
    }

    Ok(())
}
