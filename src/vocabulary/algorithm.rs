//! Interval-doubling review scheduler
//!
//! Familiarity levels:
//! - 1: Unfamiliar, back to daily review
//! - 3: Fuzzy, interval grows by one day
//! - 5: Familiar, interval doubles
//!
//! Any other level leaves the interval unchanged.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Self-assessed familiarity with a word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Familiarity {
    Unfamiliar,
    Fuzzy,
    Familiar,
}

impl Familiarity {
    pub fn level(self) -> i32 {
        match self {
            Familiarity::Unfamiliar => 1,
            Familiarity::Fuzzy => 3,
            Familiarity::Familiar => 5,
        }
    }

    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            1 => Some(Familiarity::Unfamiliar),
            3 => Some(Familiarity::Fuzzy),
            5 => Some(Familiarity::Familiar),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Familiarity::Unfamiliar => "unfamiliar",
            Familiarity::Fuzzy => "fuzzy",
            Familiarity::Familiar => "familiar",
        }
    }
}

/// Scheduling limits.
///
/// `max_interval_days = None` keeps intervals unbounded: repeated familiar
/// marks keep doubling until the integer saturates. Review dates stop at
/// [`latest_review_date`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPolicy {
    #[serde(default)]
    pub max_interval_days: Option<u32>,
}

/// Result of scheduling the next review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleResult {
    pub interval: u32,
    pub next_review: NaiveDate,
}

/// Latest review date that still stores as a four-digit `YYYY-MM-DD`.
///
/// Later dates gain a sign when formatted and would no longer compare
/// correctly as text.
pub fn latest_review_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Calculate the next interval and review date for a familiarity mark.
pub fn calculate_next_review(
    current_interval: u32,
    level: i32,
    today: NaiveDate,
    policy: &ReviewPolicy,
) -> ScheduleResult {
    let current = current_interval.max(1);

    let interval = match Familiarity::from_level(level) {
        Some(Familiarity::Unfamiliar) => 1,
        Some(Familiarity::Fuzzy) => current.saturating_add(1),
        Some(Familiarity::Familiar) => current.saturating_mul(2),
        None => current,
    };

    let interval = match policy.max_interval_days {
        Some(cap) => interval.min(cap.max(1)),
        None => interval,
    };

    let latest = latest_review_date();
    let next_review = today
        .checked_add_days(Days::new(u64::from(interval)))
        .filter(|date| *date <= latest)
        .unwrap_or(latest);

    ScheduleResult {
        interval,
        next_review,
    }
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 1 {
        "1d".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
