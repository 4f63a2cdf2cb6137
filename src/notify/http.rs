// src/notify/http.rs

//! Push notifications over HTTP.
//!
//! Sends `POST <url>` with a JSON body `{"message": ..., "host": ...}` and an
//! optional bearer token. `host` names the machine the job ran on. Any
//! non-2xx answer is an error; retries are left to the endpoint.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use sysinfo::System;
use tracing::debug;

use super::Notifier;
use crate::errors::{CronwrapError, Result};

/// Used when the hostname cannot be determined.
const UNKNOWN_HOST: &str = "unknown";

#[derive(Debug, Serialize)]
struct PushPayload<'a> {
    message: &'a str,
    host: &'a str,
}

/// Hostname reported in every notification.
pub fn local_host_name() -> String {
    System::host_name()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

#[derive(Debug, Clone)]
pub struct HttpNotifier {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
    host: String,
}

impl HttpNotifier {
    pub fn new(url: String, token: Option<String>, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("cronwrap"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            url,
            token,
            host: local_host_name(),
        })
    }

    async fn post(&self, message: &str) -> Result<()> {
        let payload = PushPayload {
            message,
            host: &self.host,
        };

        let mut request = self.http.post(&self.url).json(&payload);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CronwrapError::NotifyError(format!(
                "push endpoint {} answered {status}",
                self.url
            )));
        }

        debug!(url = %self.url, %status, "notification delivered");
        Ok(())
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, message: String) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move { self.post(&message).await })
    }
}
