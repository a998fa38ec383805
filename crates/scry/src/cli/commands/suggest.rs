//! Implementation of `scry suggest`.

use std::{collections::HashSet, process::ExitCode};

use futures_util::StreamExt;
use scry_query::{FilterExpr, parse_expression};
use scry_suggest::{PrefixKind, Suggestion};
use tokio::runtime::Builder;
use tracing::debug;

use crate::cli::{
    args::SuggestCommand,
    context::CommandContext,
    output::{dim, highlight_range, print_json, subheader},
};

/// Streams suggestions for partial filter text and prints every snapshot.
pub fn run(ctx: &CommandContext, cmd: &SuggestCommand) -> ExitCode {
    let existing = match parse_existing(&cmd.existing) {
        Ok(existing) => existing,
        Err(code) => return code,
    };

    if let Some(cursor) = cmd.cursor
        && cursor > cmd.text.len()
    {
        eprintln!(
            "error: cursor {cursor} is past the end of the text ({} bytes)",
            cmd.text.len()
        );
        return ExitCode::FAILURE;
    }

    let limit = cmd.limit.unwrap_or(ctx.config.suggest.limit);
    let runtime = match Builder::new_current_thread().enable_time().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let provider = ctx.provider();
    let snapshots: Vec<Vec<Suggestion>> = runtime.block_on(async {
        let stream = match cmd.cursor {
            Some(cursor) => provider.suggestions_at(&cmd.text, cursor, &existing, limit),
            None => provider.suggestions(&cmd.text, &existing, limit),
        };
        stream.collect().await
    });
    debug!(snapshots = snapshots.len(), "suggestion stream finished");

    if cmd.json {
        return print_json(&snapshots);
    }

    for (i, snapshot) in snapshots.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let title = if i == 0 {
            "Suggestions:"
        } else {
            "With card names:"
        };
        println!("{}", subheader(title));
        print_snapshot(snapshot);
    }

    ExitCode::SUCCESS
}

/// Parses each `--existing` filter, reporting the first that fails.
fn parse_existing(filters: &[String]) -> Result<HashSet<FilterExpr>, ExitCode> {
    filters
        .iter()
        .map(|filter| {
            parse_expression(filter).map_err(|e| {
                eprintln!("error: invalid --existing filter");
                eprintln!("{}", e.to_string().trim_end());
                ExitCode::FAILURE
            })
        })
        .collect()
}

/// Prints one snapshot, one suggestion per line.
fn print_snapshot(snapshot: &[Suggestion]) {
    if snapshot.is_empty() {
        println!("   {}", dim("(none)"));
        return;
    }
    for suggestion in snapshot {
        let rendered = suggestion.rendered();
        println!(
            "   {:<9} {} {}",
            suggestion.kind.label(),
            highlight_range(&rendered, suggestion.match_range.as_ref()),
            dim(prefix_label(suggestion.prefix_kind))
        );
    }
}

/// Display name for a prefix kind.
fn prefix_label(kind: PrefixKind) -> &'static str {
    match kind {
        PrefixKind::Actual => "prefix",
        PrefixKind::Effective => "effective prefix",
        PrefixKind::None => "contains",
    }
}
