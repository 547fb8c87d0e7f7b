/// Core data types for the weather hazard briefing service.
///
/// This module defines the shared domain model imported by all other modules:
/// the per-region records produced by the fetchers, the `WeatherDocument`
/// handed to prompt building and rendering, and the error types that cross
/// module boundaries. It contains no I/O.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Region configuration
// ---------------------------------------------------------------------------

/// A monitored region (usually a state or territory).
///
/// Loaded once from `regions.toml` and never mutated. The alert/gauge area
/// code lives here so no lookup table has to be rebuilt at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub name: String,
    /// Two-letter area code used by the alerts and gauges endpoints.
    pub region_code: String,
    /// NWS forecast office identifiers, in reporting order.
    pub offices: Vec<String>,
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// Outcome of a single office's discussion fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Ok,
    /// The office has no AFD product, or the product carried no text.
    NoData,
    /// The upstream request failed; the record text holds the cause.
    Error,
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Ok => write!(f, "ok"),
            FetchStatus::NoData => write!(f, "no_data"),
            FetchStatus::Error => write!(f, "error"),
        }
    }
}

/// Area Forecast Discussion text for one office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionRecord {
    pub office_id: String,
    pub text: String,
    pub fetch_status: FetchStatus,
}

impl DiscussionRecord {
    pub fn ok(office_id: &str, text: String) -> Self {
        Self { office_id: office_id.to_string(), text, fetch_status: FetchStatus::Ok }
    }

    pub fn no_data(office_id: &str, text: &str) -> Self {
        Self {
            office_id: office_id.to_string(),
            text: text.to_string(),
            fetch_status: FetchStatus::NoData,
        }
    }

    pub fn error(office_id: &str, err: &FetchError) -> Self {
        Self {
            office_id: office_id.to_string(),
            text: format!("Failed to fetch discussion: {}", err),
            fetch_status: FetchStatus::Error,
        }
    }
}

/// One active hazard alert, copied from the upstream feature's `properties`.
///
/// Fields are passed through as-is; `raw_payload` keeps the whole feature
/// so renderers can reach anything not lifted out here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub event: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub area_description: Option<String>,
    pub raw_payload: serde_json::Value,
}

/// A river gauge whose forecast stage exceeds its flood stage.
///
/// Stage values keep the NWPS text when the API sends strings (trimmed).
/// Numeric values are rendered in serde_json's canonical number form, so a
/// reported `12.50` reads `12.5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeRecord {
    pub gauge_id: String,
    pub region_code: String,
    pub location_name: Option<String>,
    pub waterbody: Option<String>,
    pub forecast_value: String,
    pub flood_stage_value: String,
    pub status: String,
}

/// Everything fetched for one region in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionReport {
    pub region: RegionSpec,
    /// One entry per configured office, in configuration order.
    pub discussions: Vec<DiscussionRecord>,
    /// API order. Empty when there are none or they could not be fetched.
    pub alerts: Vec<AlertRecord>,
    pub gauges: Vec<GaugeRecord>,
}

/// NHC Atlantic 7-day tropical weather outlook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TropicalOutlook {
    pub summary: String,
    /// Highest 7-day formation chance across all disturbances, in percent.
    pub formation_chance_7day: u8,
    pub details: Vec<String>,
    pub error: Option<String>,
}

/// Root artifact of a run: one report per region, keyed by region name in
/// configuration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDocument {
    pub generated_at: DateTime<Utc>,
    pub tropical: Option<TropicalOutlook>,
    pub regions: IndexMap<String, RegionReport>,
}

impl WeatherDocument {
    /// All alerts across all regions, in region then API order.
    pub fn all_alerts(&self) -> impl Iterator<Item = &AlertRecord> {
        self.regions.values().flat_map(|r| r.alerts.iter())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from a single upstream request. Never fatal to a run: every fetcher
/// converts these into a degraded record at its boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// No response within the per-request timeout.
    #[error("request timeout after {after:?}: {url}")]
    Timeout { url: String, after: Duration },
    /// Connection, TLS or body-read failure.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },
    /// Non-2xx HTTP response.
    #[error("HTTP error {status} from {url}")]
    Upstream { url: String, status: u16 },
    /// The body was not the expected JSON shape.
    #[error("parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    /// Timeouts and connection failures, as opposed to answers we did not like.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Transport { .. })
    }

    pub fn parse(url: &str, message: impl Into<String>) -> Self {
        FetchError::Parse { url: url.to_string(), message: message.into() }
    }
}

/// Missing or invalid configuration. The only error class that aborts a run,
/// and it always does so before any fetch begins.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("no regions configured")]
    NoRegions,
    #[error("region '{region}' has invalid region code '{code}' (expected two letters)")]
    InvalidRegionCode { region: String, code: String },
    #[error("region '{region}' has no forecast offices")]
    NoOffices { region: String },
    #[error("region '{0}' is configured more than once")]
    DuplicateRegion(String),
    #[error("user agent must not be empty (upstream APIs reject unidentified clients)")]
    EmptyUserAgent,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("invalid replay file {}: {message}", .path.display())]
    Replay { path: PathBuf, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
