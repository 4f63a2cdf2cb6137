// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CronwrapError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Notification error: {0}")]
    NotifyError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for CronwrapError {
    fn from(err: reqwest::Error) -> Self {
        CronwrapError::NotifyError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CronwrapError>;
