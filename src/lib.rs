// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod notify;

use anyhow::Result;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::Config;
use crate::exec::ProcessRunner;

/// High-level entry point used by `main.rs`.
///
/// Runs the wrapped command once and returns the exit code the wrapper
/// itself should exit with, which is always the command's own exit code.
/// An `Err` means the command was never started.
pub async fn run(args: CliArgs, cfg: Config) -> Result<i32> {
    let runner = ProcessRunner::from_config(&cfg)?;

    match runner.run(&args.command).await {
        Ok(outcome) => {
            info!(
                run = %outcome.run_key,
                exit_code = outcome.exit_code,
                retained = outcome.retained,
                "cronwrap done"
            );
            Ok(outcome.exit_code)
        }
        Err(err) => {
            error!(error = ?err, "cron not started");
            Err(err)
        }
    }
}
