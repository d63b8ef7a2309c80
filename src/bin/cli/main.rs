mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lexideck_lib::navigation::Screen;
use lexideck_lib::vocabulary::StudyMode;

#[derive(Parser)]
#[command(name = "lexideck-cli", about = "Vocabulary flashcards with spaced repetition", version)]
struct Cli {
    /// Use a specific data directory (default: platform local data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Show word counts
    Stats,

    /// List words for a study mode (learn, review, mastered)
    List {
        mode: StudyMode,
    },

    /// Add a word by hand
    Add {
        word: String,
        /// Example sentence
        #[arg(long)]
        example: Option<String>,
        /// Translation in the primary language
        #[arg(long)]
        translation: Option<String>,
        /// Translation in the secondary language
        #[arg(long)]
        secondary: Option<String>,
    },

    /// Add the most frequent words not stored yet, with enrichment
    Acquire {
        /// Number of words (capped at 100)
        #[arg(long)]
        count: Option<usize>,
        /// Rebuild the cached top-words list from the dataset first
        #[arg(long)]
        rebuild: bool,
    },

    /// Study words interactively
    Study {
        mode: StudyMode,
    },

    /// Record a familiarity level (1 unfamiliar, 3 fuzzy, 5 familiar)
    Mark {
        word: String,
        level: i32,
    },

    /// Mark a word as mastered
    Master {
        word: String,
    },

    /// Retry enrichment for words with missing details
    Enrich {
        /// Maximum number of words to retry
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export all words to CSV
    Export {
        /// Destination (default: <data dir>/vocabulary_export.csv)
        path: Option<PathBuf>,
    },

    /// Import words from a CSV export
    Import {
        /// Source (default: <data dir>/vocabulary_export.csv)
        path: Option<PathBuf>,
    },

    /// Delete every word
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// API key and model for the enrichment service
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Download (or reuse) pronunciation audio for a word
    Say {
        word: String,
    },

    /// Show screens and where each one leads right now
    Screens {
        /// Resolve a single screen
        screen: Option<Screen>,
        /// Check the API key with a live request
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show the stored model and whether a key is set
    Show,
    /// Store the API key
    SetKey { key: String },
    /// Store the model name (empty restores the default)
    SetModel { model: Option<String> },
    /// Remove the stored key and model
    Clear,
    /// Check the stored key with a live request
    Validate,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let app = app::App::new(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Stats => {
            commands::stats::run(&app, &cli.format, use_color)?;
        }
        Command::List { mode } => {
            commands::list::run(&app, mode, &cli.format, use_color)?;
        }
        Command::Add { word, example, translation, secondary } => {
            commands::add::run(&app, &word, example, translation, secondary, &cli.format)?;
        }
        Command::Acquire { count, rebuild } => {
            commands::acquire::run(&app, count, rebuild, &cli.format, use_color)?;
        }
        Command::Study { mode } => {
            commands::study::run(&app, mode, use_color)?;
        }
        Command::Mark { word, level } => {
            commands::review::run_mark(&app, &word, level, &cli.format)?;
        }
        Command::Master { word } => {
            commands::review::run_master(&app, &word, &cli.format)?;
        }
        Command::Enrich { limit } => {
            commands::acquire::run_enrich(&app, limit, &cli.format)?;
        }
        Command::Export { path } => {
            commands::exchange::run_export(&app, path, &cli.format)?;
        }
        Command::Import { path } => {
            commands::exchange::run_import(&app, path, &cli.format)?;
        }
        Command::Reset { yes } => {
            commands::reset::run(&app, yes, &cli.format)?;
        }
        Command::Settings(subcmd) => match subcmd {
            SettingsCommand::Show => commands::settings::run_show(&app, &cli.format)?,
            SettingsCommand::SetKey { key } => commands::settings::run_set_key(&app, &key)?,
            SettingsCommand::SetModel { model } => {
                commands::settings::run_set_model(&app, model.as_deref().unwrap_or(""))?
            }
            SettingsCommand::Clear => commands::settings::run_clear(&app)?,
            SettingsCommand::Validate => commands::settings::run_validate(&app, &cli.format)?,
        },
        Command::Say { word } => {
            commands::say::run(&app, &word, &cli.format)?;
        }
        Command::Screens { screen, validate } => {
            commands::screens::run(&app, screen, validate, &cli.format, use_color)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
