// src/exec/name.rs

//! Run naming: which job is this, and when did it start.

use std::path::Path;

use chrono::{DateTime, Local};

/// Interpreters that say nothing about the job they run.
const SHELL_BLACKLIST: &[&str] = &["sh", "bash"];

/// Name used when no meaningful command name can be derived.
pub const EMPTY_NAME: &str = "empty";

/// Layout of the per-run timestamp directory.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Derive the canonical job name from an argument vector.
///
/// Takes the basename of the first element; shells from the blacklist are
/// skipped so that `bash -c backup.sh` is named after what follows the shell.
/// Note that shell flags such as `-c` are not blacklisted and will therefore
/// become the name.
pub fn resolve_name<S: AsRef<str>>(argv: &[S]) -> String {
    let mut rest = argv;
    while let Some((first, tail)) = rest.split_first() {
        let name = basename(first.as_ref());
        if !SHELL_BLACKLIST.contains(&name.as_str()) {
            return name;
        }
        rest = tail;
    }
    EMPTY_NAME.to_string()
}

fn basename(arg: &str) -> String {
    Path::new(arg)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg.to_string())
}

/// Identity of one run: `{base_name}/{timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentity {
    base_name: String,
    timestamp: String,
}

impl RunIdentity {
    pub fn new<S: AsRef<str>>(argv: &[S], started_at: DateTime<Local>) -> Self {
        Self {
            base_name: resolve_name(argv),
            timestamp: started_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn now<S: AsRef<str>>(argv: &[S]) -> Self {
        Self::new(argv, Local::now())
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn run_key(&self) -> String {
        format!("{}/{}", self.base_name, self.timestamp)
    }
}
