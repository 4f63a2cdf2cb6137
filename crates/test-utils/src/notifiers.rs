use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cronwrap::errors::{CronwrapError, Result};
use cronwrap::notify::Notifier;

/// A notifier that records every message it was asked to deliver.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recorded messages; stays valid after the notifier
    /// was moved into a runner.
    pub fn messages(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.sent)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let sent = Arc::clone(&self.sent);
        Box::pin(async move {
            sent.lock().unwrap().push(message);
            Ok(())
        })
    }
}

/// A notifier whose transport is always down.
#[derive(Debug, Clone, Default)]
pub struct FailingNotifier {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.attempts)
    }
}

impl Notifier for FailingNotifier {
    fn notify(&self, _message: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let attempts = Arc::clone(&self.attempts);
        Box::pin(async move {
            *attempts.lock().unwrap() += 1;
            Err(CronwrapError::NotifyError("push endpoint unreachable".to_string()))
        })
    }
}

/// A notifier that never answers within any reasonable timeout.
#[derive(Debug, Clone, Default)]
pub struct HangingNotifier;

impl Notifier for HangingNotifier {
    fn notify(&self, _message: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
    }
}
