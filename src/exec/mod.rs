// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the wrapped command using `tokio::process::Command` and
//! captures everything it writes.
//!
//! - [`name`] derives the run name and timestamp ([`RunIdentity`]).
//! - [`run_dir`] owns the per-run directory.
//! - [`run_log`] is the per-run log sink, isolated from the process log.
//! - [`capture`] drains stdout/stderr concurrently into the sink.
//! - [`runner`] orchestrates one run and applies the retention and
//!   notification policy.

pub mod capture;
pub mod name;
pub mod run_dir;
pub mod run_log;
pub mod runner;

pub use capture::{CaptureState, StreamCapture, StreamKind};
pub use name::{RunIdentity, resolve_name};
pub use run_dir::RunDirectory;
pub use run_log::{RunLevel, RunLogger};
pub use runner::{ProcessRunner, RunOutcome};
