//! Implementation of `scry config`.

use std::process::ExitCode;

use crate::cli::{context::CommandContext, output::dim};

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;
    if config.files.is_empty() {
        eprintln!("{}", dim("no configuration files found; showing defaults"));
    }
    print!("{}", config.settings_to_toml());
    ExitCode::SUCCESS
}
