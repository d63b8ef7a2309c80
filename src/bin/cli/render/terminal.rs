use chrono::NaiveDate;

use lexideck_lib::vocabulary::{format_interval, Familiarity, VocabularyEntry};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn familiarity_color(level: i32) -> &'static str {
    match Familiarity::from_level(level) {
        Some(Familiarity::Unfamiliar) => Color::RED,
        Some(Familiarity::Fuzzy) => Color::YELLOW,
        Some(Familiarity::Familiar) => Color::GREEN,
        None => Color::GRAY,
    }
}

/// Short status for list output
pub fn status(entry: &VocabularyEntry, today: NaiveDate) -> String {
    if entry.mastered {
        "mastered".to_string()
    } else if !entry.learned {
        "new".to_string()
    } else if entry.is_due(today) {
        "due now".to_string()
    } else {
        match entry.next_review {
            Some(date) => format!("due {}", date.format("%Y-%m-%d")),
            None => "learned".to_string(),
        }
    }
}

/// Render a full card: word, translations, example and schedule
pub fn render_entry(entry: &VocabularyEntry, today: NaiveDate, use_color: bool) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "{}  {}",
        paint(&entry.word, Color::BOLD, use_color),
        paint(
            &format!("({}; {})", entry.part_of_speech_or_unknown(), entry.tense_info_or_unknown()),
            Color::DIM,
            use_color
        ),
    ));

    let field = |label: &str, value: &str| {
        let value = if value.trim().is_empty() { "-" } else { value };
        wrap_lines(&format!("{}: {}", label, value), "  ", 80)
    };

    lines.extend(field("Translation", &entry.translation_primary));
    lines.extend(field("Translation (2)", &entry.translation_secondary));
    lines.extend(field("Example", &entry.example));
    lines.extend(field("Example translation", &entry.example_translation_primary));
    lines.extend(field("Example translation (2)", &entry.example_translation_secondary));

    if entry.learned {
        let label = Familiarity::from_level(entry.familiarity)
            .map(|f| f.label())
            .unwrap_or("unrated");
        lines.push(format!(
            "  {} / every {} / {}",
            paint(label, familiarity_color(entry.familiarity), use_color),
            format_interval(entry.interval),
            status(entry, today),
        ));
    }

    lines.join("\n")
}

/// Simple word-wrapping for terminal output
fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(format!("{}{}", prefix, current_line));
                current_line = word.to_string();
            }
        }
        if !current_line.is_empty() {
            lines.push(format!("{}{}", prefix, current_line));
        }
    }

    if lines.is_empty() && !text.is_empty() {
        lines.push(format!("{}{}", prefix, text));
    }

    lines
}
