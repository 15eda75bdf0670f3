// CLI module
// Command-line interface: argument parsing, command dispatch, logging setup

mod args;
pub mod commands;
pub mod logging;

pub use args::{CliArgs, Command};
pub use commands::{run, run_command, CommandError};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments, or
/// --help), clap prints an error or help text and exits the process.
///
/// # Returns
///
/// The parsed CliArgs, with `--store` taken from `BANK_LEDGER_STORE` when
/// the flag is absent.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
