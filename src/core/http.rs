//! HTTP client utilities.
//!
//! Provides a shared HTTP client for the dispatcher and the prober. A bounded
//! timeout is applied to every outbound call so a stalled provider degrades
//! into the offline fallback instead of hanging the caller.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{InkwrightError, Result};

/// Default timeout for dispatch requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for connection probes; probes are meant to answer fast.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("inkwright/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| InkwrightError::Network(e.to_string()))
}

/// Get or create a default HTTP client.
pub fn default_client() -> Result<Client> {
    build_client(DEFAULT_TIMEOUT)
}

/// Fetch JSON from a URL with a plain GET.
///
/// Used by the local-daemon model listing probes.
///
/// # Errors
///
/// Returns error on network failure, non-2xx status, or JSON parse failure.
pub async fn fetch_json<T: serde::de::DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            InkwrightError::Timeout {
                provider: url.to_string(),
                seconds: DEFAULT_TIMEOUT.as_secs(),
            }
        } else {
            InkwrightError::Network(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(InkwrightError::Network(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }

    response
        .json()
        .await
        .map_err(|e| InkwrightError::Network(format!("unreadable body from {}: {}", url, e)))
}
