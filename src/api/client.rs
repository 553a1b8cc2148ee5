use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result};
use reqwest::StatusCode;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin wrapper around a configured `reqwest::Client` for the test results
/// API. Every failure surfaces as a single human-readable error message;
/// callers never see raw HTTP or parse errors.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// GET an API-relative path and return the raw response body.
    pub async fn fetch_json(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(%url, error = %e, "transport failure");
                return Err(eyre!("{}", error_message(None, None)));
            }
        };
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(
            %url,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "request completed"
        );
        if !status.is_success() {
            return Err(eyre!("{}", error_message(Some(status), Some(&body))));
        }
        Ok(body)
    }

    pub async fn fetch_summary(&self, limit: usize) -> Result<String> {
        self.fetch_json(&format!("/test-runs/summary?limit={limit}")).await
    }

    pub async fn fetch_detail(&self, id: &str) -> Result<String> {
        self.fetch_json(&format!("/test-runs/{id}")).await
    }
}

/// Failure-message precedence for a request: the `message` field of a JSON
/// error body, else the raw body text, else the HTTP status code, else the
/// literal "Unknown error" for transport failures with no response at all.
pub fn error_message(status: Option<StatusCode>, body: Option<&str>) -> String {
    if let Some(body) = body {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(message) = value.get("message").and_then(serde_json::Value::as_str) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
        let text = body.trim();
        if !text.is_empty() {
            return text.to_string();
        }
    }
    if let Some(status) = status {
        return format!("Request failed with status {}", status.as_u16());
    }
    "Unknown error".to_string()
}
