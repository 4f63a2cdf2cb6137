// src/exec/run_dir.rs

//! Per-run log directory: `{cron_log_dir}/{base_name}/{timestamp}/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::name::RunIdentity;

/// Name of the single file inside a run directory.
pub const LOG_FILE_NAME: &str = "log";

/// How many `-N` suffixes are tried when a run directory already exists.
const MAX_COLLISIONS: usize = 100;

/// A freshly created directory owned by exactly one run.
#[derive(Debug)]
pub struct RunDirectory {
    path: PathBuf,
    run_key: String,
}

impl RunDirectory {
    /// Create the run directory under `root`.
    ///
    /// Parents are created as needed, the leaf must be new: a second run of
    /// the same job within the same second gets `{timestamp}-1`, `-2`, ...
    pub fn create(root: &Path, identity: &RunIdentity) -> io::Result<Self> {
        let parent = root.join(identity.base_name());
        fs::create_dir_all(&parent)?;

        for attempt in 0..=MAX_COLLISIONS {
            let leaf = if attempt == 0 {
                identity.timestamp().to_string()
            } else {
                format!("{}-{attempt}", identity.timestamp())
            };
            let path = parent.join(&leaf);

            match fs::create_dir(&path) {
                Ok(()) => {
                    let run_key = format!("{}/{leaf}", identity.base_name());
                    return Ok(Self { path, run_key });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "run directory exists; trying next suffix");
                }
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "no free run directory for {} after {MAX_COLLISIONS} attempts",
                identity.run_key()
            ),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `{base_name}/{leaf}` of the directory actually created, including
    /// any collision suffix.
    pub fn run_key(&self) -> &str {
        &self.run_key
    }

    pub fn log_path(&self) -> PathBuf {
        self.path.join(LOG_FILE_NAME)
    }

    /// Delete the directory and everything in it.
    pub fn remove(self) -> io::Result<()> {
        fs::remove_dir_all(&self.path)
    }
}
