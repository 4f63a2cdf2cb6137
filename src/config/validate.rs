// src/config/validate.rs

use std::path::Path;
use std::time::Duration;

use crate::config::model::{Config, NotifyConfig, NotifySection, RawConfig};
use crate::errors::{CronwrapError, Result};
use crate::logging::parse_level_str;

impl TryFrom<RawConfig> for Config {
    type Error = CronwrapError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        validate_paths(&raw)?;
        let log_level = validate_log_level(raw.log_level.as_deref())?;
        let notify = validate_notify(raw.notify)?;
        Ok(Config::new_unchecked(
            raw.log_file,
            raw.cron_log_dir,
            log_level,
            notify,
        ))
    }
}

fn validate_paths(cfg: &RawConfig) -> Result<()> {
    ensure_non_empty_path("log_file", &cfg.log_file)?;
    ensure_non_empty_path("cron_log_dir", &cfg.cron_log_dir)?;
    Ok(())
}

fn ensure_non_empty_path(key: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(CronwrapError::ConfigError(format!(
            "`{key}` must not be empty"
        )));
    }
    Ok(())
}

fn validate_log_level(level: Option<&str>) -> Result<Option<tracing::Level>> {
    match level {
        None => Ok(None),
        Some(s) => parse_level_str(s).map(Some).ok_or_else(|| {
            CronwrapError::ConfigError(format!(
                "invalid log_level: {s} (expected error, warn, info, debug or trace)"
            ))
        }),
    }
}

fn validate_notify(section: NotifySection) -> Result<NotifyConfig> {
    if section.timeout_secs == 0 {
        return Err(CronwrapError::ConfigError(
            "[notify].timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    let url = section
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    if let Some(ref url) = url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CronwrapError::ConfigError(format!(
                "[notify].url must be an http(s) URL (got '{url}')"
            )));
        }
    }

    let token = section
        .token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(NotifyConfig {
        url,
        token,
        timeout: Duration::from_secs(section.timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::try_from(RawConfig::default()).unwrap();
        assert_eq!(cfg.log_file, PathBuf::from("/var/log/cronwrap"));
        assert_eq!(cfg.cron_log_dir, PathBuf::from("/var/log/cron/"));
        assert!(cfg.notify.url.is_none());
        assert_eq!(cfg.notify.timeout, Duration::from_secs(10));
    }

    #[test]
    fn empty_cron_log_dir_is_rejected() {
        let raw = RawConfig {
            cron_log_dir: PathBuf::new(),
            ..RawConfig::default()
        };
        match Config::try_from(raw) {
            Err(CronwrapError::ConfigError(msg)) => assert!(msg.contains("cron_log_dir")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut raw = RawConfig::default();
        raw.notify.timeout_secs = 0;
        assert!(matches!(
            Config::try_from(raw),
            Err(CronwrapError::ConfigError(_))
        ));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let mut raw = RawConfig::default();
        raw.notify.url = Some("ftp://example.net".to_string());
        match Config::try_from(raw) {
            Err(CronwrapError::ConfigError(msg)) => assert!(msg.contains("ftp://")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn blank_url_means_no_push() {
        let mut raw = RawConfig::default();
        raw.notify.url = Some("   ".to_string());
        let cfg = Config::try_from(raw).unwrap();
        assert!(cfg.notify.url.is_none());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let raw = RawConfig {
            log_level: Some("loud".to_string()),
            ..RawConfig::default()
        };
        assert!(matches!(
            Config::try_from(raw),
            Err(CronwrapError::ConfigError(_))
        ));
    }
}
