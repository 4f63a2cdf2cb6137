// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{Config, RawConfig};
use crate::errors::Result;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CRONWRAP_CONFIG";

/// Load a configuration file from a given path and return the raw `RawConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it, without looking at
/// the environment.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = load_from_path(&path)?;
    let config = Config::try_from(raw_config)?;
    Ok(config)
}

/// Load the configuration the way the binary does: config file (if any),
/// then environment overrides, then validation.
pub fn load_from_env() -> Result<Config> {
    load_with(|key| std::env::var(key).ok())
}

/// Same as [`load_from_env`] but with an injectable variable lookup.
///
/// - `CRONWRAP_CONFIG` set: that file must exist and parse.
/// - otherwise `/etc/cronwrap.toml` is read if present, defaults if not.
pub fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match lookup(CONFIG_ENV).filter(|p| !p.trim().is_empty()) {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_from_path(&path)?
            } else {
                debug!(path = %path.display(), "no config file; using defaults");
                RawConfig::default()
            }
        }
    };

    Config::try_from(apply_env_overrides(raw, &lookup))
}

/// Apply environment overrides on top of file values.
///
/// Recognised variables: `LOG_FILE` / `CRONWRAP_LOG_FILE`, `CRON_LOG_DIR`,
/// `CRONWRAP_LOG`, `CRONWRAP_NOTIFY_URL`, `CRONWRAP_NOTIFY_TOKEN`.
/// The `CRONWRAP_`-prefixed log file name wins over the bare one.
pub fn apply_env_overrides<F>(mut raw: RawConfig, lookup: &F) -> RawConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("CRONWRAP_LOG_FILE").or_else(|| get("LOG_FILE")) {
        raw.log_file = PathBuf::from(v);
    }
    if let Some(v) = get("CRON_LOG_DIR") {
        raw.cron_log_dir = PathBuf::from(v);
    }
    if let Some(v) = get("CRONWRAP_LOG") {
        raw.log_level = Some(v);
    }
    if let Some(v) = get("CRONWRAP_NOTIFY_URL") {
        raw.notify.url = Some(v);
    }
    if let Some(v) = get("CRONWRAP_NOTIFY_TOKEN") {
        raw.notify.token = Some(v);
    }

    raw
}

/// Default config location.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("/etc/cronwrap.toml")
}
