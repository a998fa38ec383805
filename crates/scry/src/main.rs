//! Command-line interface for `scry`, a card filter query toolkit.
//!
//! `scry` parses filter text the way a search box would, shows the token stream behind it, and
//! previews the ranked autocomplete suggestions produced for partially typed filters.

mod cli;

use std::{io, process::ExitCode};

use cli::{
    CommandContext,
    args::{Commands, parse_cli},
    commands,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = parse_cli();
    init_logging(cli.verbose);

    let ctx = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}

/// Installs the stderr log subscriber.
///
/// `SCRY_LOG` takes precedence; otherwise `-v` selects debug and `-vv` trace.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("SCRY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}
