//! Implementation of `scry check`.

use std::process::ExitCode;

use scry_config::ConfigWarning;

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows configuration files and saved filters, then reports validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    if config.files.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("scry init")
        );
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files:"));
    for path in &config.files {
        println!("   {}", path.display());
    }
    println!();

    println!("{}", subheader("Card names:"));
    match &config.catalog.names {
        Some(path) if path.is_file() => println!("   {}", path.display()),
        Some(path) => println!("   {} {}", path.display(), warning("[missing]")),
        None => println!("   {}", dim("(not configured)")),
    }
    println!();

    println!(
        "{}",
        subheader(&format!(
            "Saved filters: {} pinned, {} history",
            config.filters.pinned.len(),
            config.filters.history.len()
        ))
    );
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints one hint per kind of warning present.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut shown_filter_hint = false;
    for w in warnings {
        match w {
            ConfigWarning::InvalidFilter { filter, .. } if !shown_filter_hint => {
                shown_filter_hint = true;
                println!(
                    "{}",
                    dim(&format!("Hint: run 'scry parse {filter:?}' to see where it fails"))
                );
            }
            ConfigWarning::NoCatalog => {
                println!(
                    "{}",
                    dim("Hint: add [catalog] names = \"cards.txt\" to .scry.toml")
                );
            }
            ConfigWarning::NamesFileMissing { .. } => {
                println!("{}", dim("Hint: the names file lists one card name per line"));
            }
            ConfigWarning::ZeroLimit => {
                println!("{}", dim("Hint: set [suggest] limit to 1 or more"));
            }
            ConfigWarning::InvalidFilter { .. } => {}
        }
    }
}
