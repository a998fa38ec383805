//! Implementation of `scry parse`.

use std::process::ExitCode;

use scry_query::{ParsedFilterOutcome, dispatch, parse_expression};
use serde::Serialize;

use crate::cli::{
    args::ParseCommand,
    output::{dim, print_json, subheader},
};

/// JSON shape of a parse report.
#[derive(Serialize)]
struct ParseReport<'a> {
    /// Text as given.
    input: &'a str,
    /// How the text was understood.
    outcome: &'a ParsedFilterOutcome,
    /// Canonical rendering, absent for empty text.
    rendered: Option<String>,
    /// Why the strict parser rejected the text, for fallbacks.
    error: Option<String>,
}

/// Parses filter text and shows the outcome.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    let text = cmd.text.join(" ");
    let outcome = dispatch(&text);
    let strict_error = matches!(outcome, ParsedFilterOutcome::Fallback(_))
        .then(|| parse_expression(text.trim()).err())
        .flatten();

    if cmd.json {
        return print_json(&ParseReport {
            input: &text,
            outcome: &outcome,
            rendered: outcome.expr().map(ToString::to_string),
            error: strict_error.as_ref().map(|e| e.message().to_string()),
        });
    }

    println!("{} {}", subheader("Outcome:"), outcome.label());
    let Some(expr) = outcome.expr() else {
        return ExitCode::SUCCESS;
    };
    println!("{} {expr}", subheader("Filter:"));
    println!();
    print!("{}", expr.tree());

    if let Some(err) = strict_error {
        println!();
        for line in err.to_string().lines() {
            println!("{}", dim(line));
        }
    }

    ExitCode::SUCCESS
}
