/// Replay mode: answer upstream requests from canned responses.
///
/// When the live APIs are unavailable (or in tests) the pipeline can run
/// against a fixed set of responses keyed by full request URL. A replay file
/// is a JSON object:
///
/// ```json
/// {
///   "https://api.weather.gov/alerts/active?area=FL": { "body": { "features": [] } },
///   "https://api.weather.gov/products/types/AFD/locations/MFL": { "timeout": true },
///   "https://www.nhc.noaa.gov/gtwo.php?basin=atlc&fdays=7": { "body": "<html>…</html>" },
///   "https://api.water.noaa.gov/nwps/v1/gauges?state=FL": { "status": 503 },
///   "https://api.weather.gov/alerts/active?area=GA": { "transport_error": "connection reset" }
/// }
/// ```
///
/// A string `body` is returned verbatim; any other JSON value is serialized.
/// URLs without an entry answer 404.

use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::client::EndpointClient;
use crate::model::{ConfigError, FetchError};

/// One canned answer.
#[derive(Debug, Clone, PartialEq)]
pub enum CannedResponse {
    Body { status: u16, body: String, delay: Duration },
    Timeout,
    Transport(String),
}

#[derive(Debug, Deserialize)]
struct ReplayEntry {
    #[serde(default = "default_status")]
    status: u16,
    #[serde(default)]
    body: serde_json::Value,
    #[serde(default)]
    delay_ms: u64,
    #[serde(default)]
    timeout: bool,
    #[serde(default)]
    transport_error: Option<String>,
}

fn default_status() -> u16 {
    200
}

impl From<ReplayEntry> for CannedResponse {
    fn from(entry: ReplayEntry) -> Self {
        if entry.timeout {
            return CannedResponse::Timeout;
        }
        if let Some(message) = entry.transport_error {
            return CannedResponse::Transport(message);
        }
        let body = match entry.body {
            serde_json::Value::String(text) => text,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        CannedResponse::Body {
            status: entry.status,
            body,
            delay: Duration::from_millis(entry.delay_ms),
        }
    }
}

/// `EndpointClient` backed by canned responses.
///
/// Records every requested URL so callers can check what was (or was not)
/// asked for.
#[derive(Debug, Default)]
pub struct ReplayClient {
    responses: HashMap<String, CannedResponse>,
    requests: RefCell<Vec<String>>,
}

impl ReplayClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads canned responses from a replay file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let replay_err = |message: String| ConfigError::Replay { path: path.to_path_buf(), message };

        let contents = fs::read_to_string(path).map_err(|e| replay_err(e.to_string()))?;
        let entries: HashMap<String, ReplayEntry> =
            serde_json::from_str(&contents).map_err(|e| replay_err(e.to_string()))?;

        let responses = entries.into_iter().map(|(url, entry)| (url, entry.into())).collect();
        Ok(Self { responses, requests: RefCell::new(Vec::new()) })
    }

    pub fn with_response(mut self, url: &str, response: CannedResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_json(self, url: &str, body: serde_json::Value) -> Self {
        self.with_text(url, &body.to_string())
    }

    pub fn with_text(self, url: &str, body: &str) -> Self {
        self.with_response(
            url,
            CannedResponse::Body { status: 200, body: body.to_string(), delay: Duration::ZERO },
        )
    }

    /// Like `with_json`, but the answer arrives only after `delay`.
    pub fn with_delayed_json(self, url: &str, body: serde_json::Value, delay: Duration) -> Self {
        self.with_response(url, CannedResponse::Body { status: 200, body: body.to_string(), delay })
    }

    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(
            url,
            CannedResponse::Body { status, body: String::new(), delay: Duration::ZERO },
        )
    }

    pub fn with_timeout(self, url: &str) -> Self {
        self.with_response(url, CannedResponse::Timeout)
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl EndpointClient for ReplayClient {
    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());

        match self.responses.get(url) {
            None => Err(FetchError::Upstream { url: url.to_string(), status: 404 }),
            Some(CannedResponse::Timeout) => {
                Err(FetchError::Timeout { url: url.to_string(), after: timeout })
            }
            Some(CannedResponse::Transport(message)) => Err(FetchError::Transport {
                url: url.to_string(),
                message: message.clone(),
            }),
            Some(CannedResponse::Body { status, body, delay }) => {
                if *delay > timeout {
                    tokio::time::sleep(timeout).await;
                    return Err(FetchError::Timeout { url: url.to_string(), after: timeout });
                }
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                if !(200..300).contains(status) {
                    return Err(FetchError::Upstream { url: url.to_string(), status: *status });
                }
                Ok(body.clone())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
