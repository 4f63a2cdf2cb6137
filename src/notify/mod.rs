// src/notify/mod.rs

//! Failure notification.
//!
//! The runner only ever talks to a [`Notifier`]. Production uses
//! [`HttpNotifier`] when a push endpoint is configured and [`LogNotifier`]
//! otherwise; tests provide their own implementation that records messages.

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::config::NotifyConfig;
use crate::errors::Result;

pub mod http;

pub use http::HttpNotifier;

/// Delivers a single human-readable failure message.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Fallback used when no push endpoint is configured: the message ends up
/// in the process-wide log only.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            warn!(%message, "no notification endpoint configured");
            Ok(())
        })
    }
}

/// Pick the notifier for the given configuration.
pub fn from_config(cfg: &NotifyConfig) -> Result<Box<dyn Notifier>> {
    match cfg.url {
        Some(ref url) => Ok(Box::new(HttpNotifier::new(
            url.clone(),
            cfg.token.clone(),
            cfg.timeout,
        )?)),
        None => Ok(Box::new(LogNotifier)),
    }
}
