// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Configuration as read from a TOML file.
///
/// ```toml
/// log_file = "/var/log/cronwrap"
/// cron_log_dir = "/var/log/cron/"
/// log_level = "debug"
///
/// [notify]
/// url = "https://push.example.net/notify"
/// token = "secret"
/// timeout_secs = 10
/// ```
///
/// Every key is optional; a missing file is equivalent to an empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    /// Process-wide operational log (`LOG_FILE`).
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Root directory for per-run logs (`CRON_LOG_DIR`).
    #[serde(default = "default_cron_log_dir")]
    pub cron_log_dir: PathBuf,

    /// Level for the process-wide log ("error", "warn", "info", "debug", "trace").
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub notify: NotifySection,
}

pub(crate) fn default_log_file() -> PathBuf {
    PathBuf::from("/var/log/cronwrap")
}

pub(crate) fn default_cron_log_dir() -> PathBuf {
    PathBuf::from("/var/log/cron/")
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            cron_log_dir: default_cron_log_dir(),
            log_level: None,
            notify: NotifySection::default(),
        }
    }
}

/// `[notify]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifySection {
    /// Push endpoint. Without it failures are only written to the process log.
    #[serde(default)]
    pub url: Option<String>,

    /// Optional bearer token sent with each notification.
    #[serde(default)]
    pub token: Option<String>,

    /// Upper bound for a single notification attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Validated configuration used by the rest of the crate.
///
/// Only obtainable through `Config::try_from(RawConfig)` (see `validate.rs`)
/// or the loader helpers.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_file: PathBuf,
    pub cron_log_dir: PathBuf,
    pub log_level: Option<tracing::Level>,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub(crate) fn new_unchecked(
        log_file: PathBuf,
        cron_log_dir: PathBuf,
        log_level: Option<tracing::Level>,
        notify: NotifyConfig,
    ) -> Self {
        Self {
            log_file,
            cron_log_dir,
            log_level,
            notify,
        }
    }
}
