//! Implementation of `scry keys`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use scry_query::{FilterKeyDescriptor, Vocabulary};

use crate::cli::output::dim;

/// Enumerated values shown per key before the rest are counted.
const VALUE_PREVIEW: usize = 6;

/// Lists the standard filter keys.
pub fn run() -> ExitCode {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Key", "Aliases", "Operators", "Values"]);

    for descriptor in Vocabulary::standard().descriptors() {
        table.add_row(vec![
            Cell::new(descriptor.name),
            Cell::new(descriptor.aliases.join(", ")),
            Cell::new(operators(descriptor)),
            Cell::new(values(descriptor)),
        ]);
    }

    println!("{table}");
    println!(
        "{}",
        dim("Keys and aliases are matched case-insensitively while typing.")
    );
    ExitCode::SUCCESS
}

/// The accepted comparisons, space separated.
fn operators(descriptor: &FilterKeyDescriptor) -> String {
    descriptor
        .operators
        .comparisons()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A preview of the enumerated values, or `-` when the key has none.
fn values(descriptor: &FilterKeyDescriptor) -> String {
    let Some(values) = descriptor.values else {
        return "-".to_string();
    };
    let shown = values
        .iter()
        .take(VALUE_PREVIEW)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    match values.len().checked_sub(VALUE_PREVIEW) {
        Some(rest) if rest > 0 => format!("{shown}, +{rest} more"),
        _ => shown,
    }
}
