use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use lexideck_lib::navigation::Screen;
use lexideck_lib::session::StudySession;
use lexideck_lib::vocabulary::{format_interval, Familiarity, StudyMode};

use crate::app::App;
use crate::render::terminal::{self, paint, Color};

enum Action {
    Mark(Familiarity),
    Master,
    Skip,
    Say,
    Quit,
}

fn parse_action(input: &str) -> Option<Action> {
    match input.trim().to_lowercase().as_str() {
        "1" => Some(Action::Mark(Familiarity::Unfamiliar)),
        "3" => Some(Action::Mark(Familiarity::Fuzzy)),
        "5" => Some(Action::Mark(Familiarity::Familiar)),
        "m" | "master" => Some(Action::Master),
        "s" | "skip" | "" => Some(Action::Skip),
        "p" | "say" => Some(Action::Say),
        "q" | "quit" => Some(Action::Quit),
        _ => None,
    }
}

pub fn run(app: &App, mode: StudyMode, use_color: bool) -> Result<()> {
    let readiness = app.readiness(true)?;
    if Screen::resolve(Screen::from(mode), readiness) == Screen::Settings {
        bail!("The enrichment service is not ready. Set a valid API key with `settings set-key` first.");
    }

    let gateway = app.gateway()?;
    let mut session = StudySession::new(&app.store, mode, app.today())
        .with_context(|| format!("Failed to start {} session", mode))?;

    if session.is_empty() {
        println!("No words to {}.", mode);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(entry) = session.current() {
        let word = entry.word.clone();
        if let Err(e) = session.ensure_enriched(&gateway) {
            log::warn!("Could not store details for {}: {}", word, e);
        }

        let (position, total) = session.progress();
        println!();
        println!("{}", paint(&format!("[{}/{}]", position, total), Color::DIM, use_color));
        if let Some(entry) = session.current() {
            println!("{}", terminal::render_entry(entry, app.today(), use_color));
        }

        print!("[1] unfamiliar  [3] fuzzy  [5] familiar  [m]astered  [s]kip  [p]ronounce  [q]uit > ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_action(&line) {
            Some(Action::Mark(familiarity)) => {
                if let Some(outcome) = session.mark(familiarity.level(), app.today())? {
                    println!(
                        "{} again in {}",
                        paint(familiarity.label(), terminal::familiarity_color(familiarity.level()), use_color),
                        format_interval(outcome.interval)
                    );
                }
            }
            Some(Action::Master) => {
                session.master()?;
                println!("{}", paint("mastered", Color::GREEN, use_color));
            }
            Some(Action::Skip) => session.skip(),
            Some(Action::Say) => match app.pronouncer()?.ensure_audio(&word) {
                Ok(path) => println!("Audio: {}", path.display()),
                Err(e) => println!("Pronunciation unavailable: {}", e),
            },
            Some(Action::Quit) => break,
            None => println!("Unknown choice '{}'", line.trim()),
        }
    }

    println!("\nReviewed {} of {} {} words", session.reviewed(), session.len(), session.mode());
    Ok(())
}
