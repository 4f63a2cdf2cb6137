// src/logging.rs

//! Process-wide logging setup for `cronwrap` using `tracing` +
//! `tracing-subscriber`.
//!
//! This is the operational log (`LOG_FILE`): one line per milestone of every
//! wrapped run, across all jobs. It is strictly separate from the per-run
//! sink in [`crate::exec::run_log`]; nothing written there propagates here.
//!
//! Priority for determining the log level:
//! 1. `CRONWRAP_LOG` environment variable (folded into the config by the loader)
//! 2. `log_level` in the config file
//! 3. default to `debug`
//!
//! Nothing is ever written to stdout: the wrapper's stdout and exit status
//! belong to the wrapped command.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing::warn;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::config::Config;

/// Timestamp layout of the process log: `2024-01-31 04:00:00.123`.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Initialise the global logging subscriber from explicit configuration.
///
/// Safe to call once at startup. If `log_file` cannot be opened for
/// appending the subscriber falls back to stderr, so a broken log location
/// never prevents the job itself from running.
pub fn init_logging(cfg: &Config) -> Result<()> {
    let level = cfg.log_level.unwrap_or(tracing::Level::DEBUG);

    match open_append(&cfg.log_file) {
        Ok(file) => {
            fmt()
                .with_max_level(level)
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_target(true)
                .with_ansi(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        Err(err) => {
            fmt()
                .with_max_level(level)
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();

            warn!(
                path = %cfg.log_file.display(),
                error = %err,
                "cannot open process log; logging to stderr"
            );
        }
    }

    Ok(())
}

fn open_append(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
