//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod init;
pub mod keys;
pub mod parse;
pub mod suggest;
pub mod tokens;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(&cmd),
        Commands::Tokens(cmd) => tokens::run(&cmd),
        Commands::Suggest(cmd) => suggest::run(ctx, &cmd),
        Commands::Keys => keys::run(),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
        Commands::Check => check::run(ctx),
    }
}
