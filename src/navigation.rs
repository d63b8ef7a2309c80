//! Application screens and the transitions between them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::vocabulary::StudyMode;

/// A screen the front end can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Learn,
    Review,
    Mastered,
    Add,
    Settings,
    Help,
}

/// Whether the enrichment service can be used right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub has_credential: bool,
    pub validated: bool,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.has_credential && self.validated
    }
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Learn,
        Screen::Review,
        Screen::Mastered,
        Screen::Add,
        Screen::Settings,
        Screen::Help,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Learn => "learn",
            Screen::Review => "review",
            Screen::Mastered => "mastered",
            Screen::Add => "add",
            Screen::Settings => "settings",
            Screen::Help => "help",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Learn => "Learn new words",
            Screen::Review => "Review",
            Screen::Mastered => "Mastered words",
            Screen::Add => "Add words",
            Screen::Settings => "Settings",
            Screen::Help => "Help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Screen::Learn => "Words not yet reviewed, oldest first",
            Screen::Review => "Learned words due today or earlier",
            Screen::Mastered => "Words marked as mastered",
            Screen::Add => "Add a word by hand or pull a batch from the frequency list",
            Screen::Settings => "API key and model for the enrichment service",
            Screen::Help => "Familiarity levels and how intervals grow",
        }
    }

    /// The study mode a screen walks through, if any
    pub fn study_mode(&self) -> Option<StudyMode> {
        match self {
            Screen::Learn => Some(StudyMode::Learn),
            Screen::Review => Some(StudyMode::Review),
            Screen::Mastered => Some(StudyMode::Mastered),
            _ => None,
        }
    }

    /// Screens that fetch enrichment need a working service
    pub fn requires_gateway(&self) -> bool {
        matches!(self, Screen::Learn | Screen::Review | Screen::Mastered | Screen::Add)
    }

    /// The screen actually shown when `requested` is asked for.
    pub fn resolve(requested: Screen, readiness: Readiness) -> Screen {
        if requested.requires_gateway() && !readiness.is_ready() {
            log::info!(
                "Enrichment service not ready, redirecting {} to settings",
                requested
            );
            Screen::Settings
        } else {
            requested
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown screen: {}", s))
    }
}

impl From<StudyMode> for Screen {
    fn from(mode: StudyMode) -> Self {
        match mode {
            StudyMode::Learn => Screen::Learn,
            StudyMode::Review => Screen::Review,
            StudyMode::Mastered => Screen::Mastered,
        }
    }
}
