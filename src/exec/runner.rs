// src/exec/runner.rs

//! Runs one wrapped command from start to finish.
//!
//! Lifecycle of a run:
//!
//! 1. name the run and create its directory + log sink (fatal on failure,
//!    nothing is started without a sink),
//! 2. spawn the child with piped stdout/stderr and attach capture workers,
//! 3. wait for the exit status *and* both workers,
//! 4. record exit code and duration,
//! 5. notify on non-zero exit, drop the directory if nothing was written.

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use super::capture::StreamCapture;
use super::name::RunIdentity;
use super::run_dir::RunDirectory;
use super::run_log::RunLogger;
use crate::config::Config;
use crate::notify::{self, Notifier};

/// Number of log lines included in a failure notification.
pub const TAIL_LINES: usize = 10;

/// Exit code reported when the command could not be started at all.
pub const SPAWN_FAILURE_EXIT: i32 = 127;

/// Result of one completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_key: String,
    pub exit_code: i32,
    pub elapsed_seconds: f64,
    pub log_path: PathBuf,
    /// At least one line was read from stdout or stderr.
    pub produced_output: bool,
    /// The run directory still exists after finalisation.
    pub retained: bool,
    /// A failure notification was delivered successfully.
    pub notified: bool,
}

pub struct ProcessRunner {
    cron_log_dir: PathBuf,
    notifier: Box<dyn Notifier>,
    notify_timeout: Duration,
}

impl ProcessRunner {
    pub fn new(
        cron_log_dir: impl Into<PathBuf>,
        notifier: Box<dyn Notifier>,
        notify_timeout: Duration,
    ) -> Self {
        Self {
            cron_log_dir: cron_log_dir.into(),
            notifier,
            notify_timeout,
        }
    }

    /// Build a runner with the notifier selected by `[notify]`.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let notifier = notify::from_config(&cfg.notify).context("building notifier")?;
        Ok(Self::new(
            cfg.cron_log_dir.clone(),
            notifier,
            cfg.notify.timeout,
        ))
    }

    /// Run `argv` to completion and apply the retention and notification
    /// policy.
    ///
    /// Errors are only returned for setup failures before the child is
    /// started. Once the child runs, a non-zero exit is an outcome.
    pub async fn run(&self, argv: &[String]) -> Result<RunOutcome> {
        let identity = RunIdentity::now(argv);
        info!(name = %identity.base_name(), args = ?argv, "starting cron");

        let dir = RunDirectory::create(&self.cron_log_dir, &identity).with_context(|| {
            format!(
                "creating run directory for '{}' under {}",
                identity.run_key(),
                self.cron_log_dir.display()
            )
        })?;
        let run_key = dir.run_key().to_string();
        info!(path = %dir.path().display(), "logging cron to run directory");

        let log_path = dir.log_path();
        let sink = match RunLogger::open(&log_path) {
            Ok(sink) => sink,
            Err(e) => {
                if let Err(rm) = std::fs::remove_dir_all(dir.path()) {
                    warn!(path = %dir.path().display(), error = %rm, "could not clean up run directory");
                }
                return Err(e).with_context(|| format!("opening run log {}", log_path.display()));
            }
        };

        record(&sink, |s| {
            s.debug(&format!("Starting cron \"{run_key}\" with args {argv:?}"))
        });

        let start = Instant::now();
        let (exit_code, produced_output) = self.execute(argv, &sink).await;
        let elapsed_seconds = start.elapsed().as_secs_f64();

        record(&sink, |s| {
            s.debug(&format!(
                "Cron \"{run_key}\" exit {exit_code} after {elapsed_seconds:.2} sec"
            ))
        });
        info!(
            exit_code,
            log_file = %log_path.display(),
            "done"
        );

        let notified = if exit_code != 0 {
            let message = failure_message(&run_key, exit_code, &sink);
            self.send_notification(message).await
        } else {
            false
        };

        let retained = if produced_output {
            true
        } else {
            info!(run = %run_key, "cron wrote no data; removing run directory");
            drop(sink);
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.remove() {
                warn!(path = %path.display(), error = %e, "failed to remove run directory");
            }
            false
        };

        Ok(RunOutcome {
            run_key,
            exit_code,
            elapsed_seconds,
            log_path,
            produced_output,
            retained,
            notified,
        })
    }

    /// Spawn the child, capture both streams, and wait for everything.
    ///
    /// Returns `(exit_code, produced_output)`.
    async fn execute(&self, argv: &[String], sink: &RunLogger) -> (i32, bool) {
        let spawned = match argv.split_first() {
            Some((program, args)) => Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn(),
            None => Err(io::Error::new(io::ErrorKind::InvalidInput, "empty command")),
        };

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                error!(args = ?argv, error = %e, "failed to start command");
                record(sink, |s| s.error(&format!("failed to start command: {e}")));
                return (SPAWN_FAILURE_EXIT, false);
            }
        };

        debug!(pid = child.id(), "child process started");
        let capture = StreamCapture::start(child.stdout.take(), child.stderr.take(), sink.clone());

        let exit_code = match child.wait().await {
            Ok(status) => exit_code_of(status),
            Err(e) => {
                error!(error = %e, "failed waiting for child process");
                record(sink, |s| s.error(&format!("failed waiting for command: {e}")));
                1
            }
        };

        // Pipes may still hold data after the child exited.
        let produced_output = capture.join().await;
        (exit_code, produced_output)
    }

    async fn send_notification(&self, message: String) -> bool {
        match tokio::time::timeout(self.notify_timeout, self.notifier.notify(message)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "failure notification could not be sent");
                false
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.notify_timeout.as_secs_f64(),
                    "failure notification timed out"
                );
                false
            }
        }
    }
}

/// Write to the run log; a failing write is reported but never aborts the run.
fn record<F>(sink: &RunLogger, write: F)
where
    F: FnOnce(&RunLogger) -> io::Result<()>,
{
    if let Err(e) = write(sink) {
        warn!(path = %sink.path().display(), error = %e, "failed to write run log");
    }
}

fn failure_message(run_key: &str, exit_code: i32, sink: &RunLogger) -> String {
    let tail = match sink.tail(TAIL_LINES) {
        Ok(lines) => lines.concat(),
        Err(e) => {
            warn!(error = %e, "could not read run log tail");
            format!("<log unavailable: {e}>\n")
        }
    };
    format!(
        "Cron {run_key} completed with status {exit_code}. Might want to check on that.\nLog tail:\n{tail}"
    )
}

/// Exit code of the child; signals map to `128 + signal` like a shell does.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
