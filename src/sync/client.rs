//! Backend HTTP Client
//!
//! Thin wrapper over reqwest for the two endpoints the shell consumes.
//! Every failure is folded into a value; nothing here returns Err upward.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Shown whenever the status endpoint cannot be reached or answers badly.
pub const CONNECTION_FAILED: &str = "Connection FAILED. Is the backend running?";

/// Fallback detail when an error response carries no usable error field.
pub const GENERIC_FETCH_ERROR: &str = "Fetch failed";

/// Status endpoint body.
#[derive(Debug, Deserialize)]
struct StatusResponse {
    message: String,
}

/// Error body shape the backend uses for non-200 responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Outcome of one fetch for one source.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Loaded(Value),
    Errored(String),
}

/// HTTP client for the backend's status and latest-data endpoints.
#[derive(Clone)]
pub struct ConsoleClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConsoleClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Probe `GET /api/status`. Returns the connectivity string to display:
    /// the server-reported message on success, the fixed failure message on
    /// any transport, protocol or decode failure.
    pub async fn probe_status(&self) -> String {
        let url = format!("{}/api/status", self.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<StatusResponse>().await {
                    Ok(status) => status.message,
                    Err(_) => CONNECTION_FAILED.to_string(),
                }
            }
            _ => CONNECTION_FAILED.to_string(),
        }
    }

    /// Fetch `GET /api/latest/{source}` for one source.
    ///
    /// Non-200 responses carry `{"error": "..."}` when the backend produced
    /// them; that field becomes the error detail, else a generic message.
    pub async fn fetch_latest(&self, source: &str) -> FetchOutcome {
        let url = format!("{}/api/latest/{}", self.base_url, source);

        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[Sync] {}: request failed: {}", source, e);
                return FetchOutcome::Errored(GENERIC_FETCH_ERROR.to_string());
            }
        };

        if response.status().is_success() {
            match response.json::<Value>().await {
                Ok(payload) => FetchOutcome::Loaded(payload),
                Err(e) => {
                    log::warn!("[Sync] {}: malformed payload: {}", source, e);
                    FetchOutcome::Errored(GENERIC_FETCH_ERROR.to_string())
                }
            }
        } else {
            let detail = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| GENERIC_FETCH_ERROR.to_string());
            FetchOutcome::Errored(detail)
        }
    }
}
