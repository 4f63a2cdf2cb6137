// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The wrapper takes no options of its own: everything after the binary name
//! is the command to run, including flags meant for that command.

use clap::Parser;

/// Command-line arguments for `cronwrap`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cronwrap",
    version,
    about = "Run a cron job, keep its output in a per-run log, and notify on failure.",
    long_about = None
)]
pub struct CliArgs {
    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
