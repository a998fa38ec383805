//! Clap argument definitions for the `scry` CLI.

use std::{env, process::exit};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "scry")]
#[command(about = "Card filter queries - parse, tokenize and autocomplete")]
pub struct Cli {
    /// Log verbosity (-v for debug, -vv for trace); SCRY_LOG overrides
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `scry parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Filter text; several arguments are joined with spaces
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `scry tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Text to tokenize
    pub text: String,

    /// Fail on unterminated quotes and regexes instead of tolerating them
    #[arg(long)]
    pub strict: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `scry suggest`.
#[derive(Args, Debug, Clone)]
pub struct SuggestCommand {
    /// Text being typed
    pub text: String,

    /// Maximum suggestions per source [default: 10]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Filters already applied; never suggested again (repeatable)
    #[arg(short = 'e', long = "existing", allow_hyphen_values = true)]
    pub existing: Vec<String>,

    /// Byte offset of the cursor; completes the term under it instead of the whole text
    #[arg(long)]
    pub cursor: Option<usize>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `scry init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.scry.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `scry` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse filter text and show how it is understood
    #[command(after_help = "\
FILTER SYNTAX:
  bolt              Card name contains \"bolt\"
  \"Lightning Bolt\"  Name contains the phrase
  /^light/          Name matches the regex
  !Opt              Name is exactly \"Opt\"
  c:red             Key, comparison and value
  mv>=3             Comparisons: : = != < <= > >=
  -is:foil          Negation
  (t:instant or t:sorcery)
                    Any of the alternatives

EXAMPLES:
  scry parse 'f:modern'
  scry parse -- '-(c:red or c:blue)'
  scry parse 'name:\"Lightning'")]
    Parse(ParseCommand),

    /// Show the token stream for filter text
    Tokens(TokensCommand),

    /// Show ranked autocomplete suggestions for partial text
    #[command(after_help = "\
Suggestions come from pinned filters, history, filter keys, enumerated values,
operator alternatives and card names, in that order. Card names arrive in a second
snapshot once the debounced lookup finishes.

EXAMPLES:
  scry suggest fo
  scry suggest 'r:my'
  scry suggest 'c:red light' --cursor 11
  scry suggest light --existing '\"Lightning Bolt\"'")]
    Suggest(SuggestCommand),

    /// List filter keys, aliases and values
    Keys,

    /// Initialize scry configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,
}

/// Parses CLI arguments, printing compact help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp && env::args().len() <= 2 {
                print_command_help();
                exit(0);
            }
            e.exit();
        }
    }
}

/// Prints the command list with one line per subcommand.
fn print_command_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: scry [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }
    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose...  Log verbosity (-v for debug, -vv for trace)");
    println!("  -h, --help        Print help");
}
