/// HTTP access to the upstream weather APIs.
///
/// `EndpointClient` is the seam every fetcher depends on: one GET, one
/// timeout, a typed `FetchError` on failure, no retries. The process builds a
/// single `HttpClient` at startup and lends it to the pipeline; tests and
/// offline runs substitute `replay::ReplayClient`.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;

use crate::model::{ConfigError, FetchError};

/// A source of upstream payloads.
///
/// Implementors provide `fetch_text`; `fetch` decodes the body as JSON.
#[allow(async_fn_in_trait)]
pub trait EndpointClient {
    /// Issues one GET and returns the body of a 2xx response.
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;

    /// Issues one GET and decodes a 2xx response body as JSON.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<serde_json::Value, FetchError> {
        let body = self.fetch_text(url, timeout).await?;
        serde_json::from_str(&body)
            .map_err(|e| FetchError::parse(url, format!("JSON deserialization failed: {}", e)))
    }
}

/// reqwest-backed client carrying the identification header on every request.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self, ConfigError> {
        if user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/geo+json, application/json;q=0.9, text/html;q=0.8"),
        );

        let inner = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { inner })
    }

    fn classify(url: &str, timeout: Duration, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout { url: url.to_string(), after: timeout }
        } else if let Some(status) = err.status() {
            FetchError::Upstream { url: url.to_string(), status: status.as_u16() }
        } else {
            FetchError::Transport { url: url.to_string(), message: err.to_string() }
        }
    }
}

impl EndpointClient for HttpClient {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        debug!(url, timeout_secs = timeout.as_secs(), "GET");

        let response = self
            .inner
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream { url: url.to_string(), status: status.as_u16() });
        }

        response.text().await.map_err(|e| Self::classify(url, timeout, e))
    }
}
