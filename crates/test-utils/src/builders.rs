use std::path::{Path, PathBuf};
use std::time::Duration;

use cronwrap::config::{Config, RawConfig};
use cronwrap::exec::ProcessRunner;
use cronwrap::notify::Notifier;
use tempfile::TempDir;

/// Builder for `Config` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfig::default(),
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = path.into();
        self
    }

    pub fn with_cron_log_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.cron_log_dir = path.into();
        self
    }

    pub fn with_notify_url(mut self, url: &str) -> Self {
        self.config.notify.url = Some(url.to_string());
        self
    }

    pub fn with_notify_timeout_secs(mut self, secs: u64) -> Self {
        self.config.notify.timeout_secs = secs;
        self
    }

    pub fn build(self) -> Config {
        Config::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A runner writing into a fresh temporary log root.
///
/// Keep the returned `TempDir` alive for as long as the run directories are
/// inspected.
pub fn runner_in_tempdir(notifier: impl Notifier + 'static) -> (TempDir, ProcessRunner) {
    runner_with_timeout(notifier, Duration::from_secs(5))
}

pub fn runner_with_timeout(
    notifier: impl Notifier + 'static,
    timeout: Duration,
) -> (TempDir, ProcessRunner) {
    let root = tempfile::tempdir().expect("creating temp log root");
    let runner = ProcessRunner::new(root.path(), Box::new(notifier), timeout);
    (root, runner)
}

/// All run directories (`{root}/{name}/{timestamp}`) under `root`.
pub fn run_dirs(root: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let Ok(names) = std::fs::read_dir(root) else {
        return dirs;
    };
    for name in names.flatten() {
        if let Ok(stamps) = std::fs::read_dir(name.path()) {
            dirs.extend(stamps.flatten().map(|e| e.path()));
        }
    }
    dirs.sort();
    dirs
}
