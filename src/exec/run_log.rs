// src/exec/run_log.rs

//! Dedicated log sink for a single run.
//!
//! Lines look like `2024-01-31 04:00:00,123 INFO : <message>`. The sink is
//! cheap to clone; every clone appends to the same file handle and whole
//! lines are written under one lock, so the two capture workers can share it
//! without tearing lines.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Severity of a run log line.
///
/// `Debug` marks lifecycle lines, `Info` the child's stdout and `Error` its
/// stderr (and capture failures).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLevel {
    Debug,
    Info,
    Error,
}

impl fmt::Display for RunLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunLevel::Debug => "DEBUG",
            RunLevel::Info => "INFO",
            RunLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct RunLogger {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl RunLogger {
    /// Open (create or append to) the sink at `path`, creating parents.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line.
    pub fn write(&self, level: RunLevel, message: &str) -> io::Result<()> {
        let line = format!(
            "{} {} : {}\n",
            Local::now().format(TIME_FORMAT),
            level,
            message
        );

        let mut file = self.file.lock().unwrap_or_else(|p| p.into_inner());
        file.write_all(line.as_bytes())?;
        file.flush()
    }

    pub fn debug(&self, message: &str) -> io::Result<()> {
        self.write(RunLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> io::Result<()> {
        self.write(RunLevel::Info, message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write(RunLevel::Error, message)
    }

    /// Read the sink back from disk and return at most its last `n` lines,
    /// each still terminated by `\n`.
    pub fn tail(&self, n: usize) -> io::Result<Vec<String>> {
        let bytes = fs::read(&self.path)?;
        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|l| l.to_string()).collect())
    }
}
