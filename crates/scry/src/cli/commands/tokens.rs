//! Implementation of `scry tokens`.

use std::process::ExitCode;

use scry_query::{LexMode, PartialTokenKind, tokenize_partial};
use serde::Serialize;

use crate::cli::{
    args::TokensCommand,
    output::{dim, print_json},
};

/// JSON shape of one token.
#[derive(Serialize)]
struct TokenReport<'a> {
    /// Token kind.
    kind: PartialTokenKind,
    /// Byte offset of the first character.
    start: usize,
    /// Byte offset past the last character.
    end: usize,
    /// Covered text.
    text: &'a str,
}

/// Tokenizes filter text and lists the tokens.
pub fn run(cmd: &TokensCommand) -> ExitCode {
    let mode = if cmd.strict {
        LexMode::Strict
    } else {
        LexMode::Tolerant
    };

    let tokens = match tokenize_partial(&cmd.text, mode) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let reports: Vec<TokenReport<'_>> = tokens
        .iter()
        .map(|token| TokenReport {
            kind: token.kind,
            start: token.range.start,
            end: token.range.end,
            text: token.text(&cmd.text),
        })
        .collect();

    if cmd.json {
        return print_json(&reports);
    }

    if reports.is_empty() {
        println!("{}", dim("(no tokens)"));
        return ExitCode::SUCCESS;
    }

    for report in &reports {
        println!(
            "{:<12} {} {:?}",
            kind_label(report.kind),
            dim(&format!("{:>3}..{:<3}", report.start, report.end)),
            report.text
        );
    }

    ExitCode::SUCCESS
}

/// Display name for a token kind.
fn kind_label(kind: PartialTokenKind) -> &'static str {
    match kind {
        PartialTokenKind::OpenParen => "open",
        PartialTokenKind::CloseParen => "close",
        PartialTokenKind::Or => "or",
        PartialTokenKind::Verbatim => "verbatim",
        PartialTokenKind::And => "and",
    }
}
