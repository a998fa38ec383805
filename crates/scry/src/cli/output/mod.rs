//! Terminal styling and JSON output for the CLI.

use std::{ops::Range, process::ExitCode};

use serde::Serialize;

/// ANSI escape codes for terminal styling.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Yellow text (for warnings and matches).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Indents every line of `text` for display under a subheader.
pub fn indent_content(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("   {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Highlights a character range of `text` in bold yellow.
///
/// Out-of-range bounds are clamped; an empty range leaves the text unstyled.
pub fn highlight_range(text: &str, range: Option<&Range<usize>>) -> String {
    let Some(range) = range.filter(|r| !r.is_empty()) else {
        return text.to_string();
    };
    let mut out = String::with_capacity(text.len() + 16);
    for (i, ch) in text.chars().enumerate() {
        if i == range.start {
            out.push_str(colors::BOLD);
            out.push_str(colors::YELLOW);
        }
        if i == range.end {
            out.push_str(colors::RESET);
        }
        out.push(ch);
    }
    if range.end >= text.chars().count() && range.start < text.chars().count() {
        out.push_str(colors::RESET);
    }
    out
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}
