/// Structured logging for the briefing service
///
/// Library code emits `tracing` events tagged with the upstream data source
/// and the office or region involved. The binary installs the subscriber via
/// `init_logging`. Fetch failures are classified before logging so that an
/// office without a product does not look like an outage.

use std::fmt;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use crate::model::FetchError;

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// api.weather.gov (discussions, alerts)
    Nws,
    /// National Water Prediction Service gauges
    Nwps,
    /// National Hurricane Center outlook page
    Nhc,
    /// LLM summarization API
    Llm,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Nws => write!(f, "NWS"),
            DataSource::Nwps => write!(f, "NWPS"),
            DataSource::Nhc => write!(f, "NHC"),
            DataSource::Llm => write!(f, "LLM"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Office or gauge simply has nothing to report (404).
    Expected,
    /// Service degradation or an API change.
    Unexpected,
    /// Could be either, e.g. a timeout.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

pub fn classify_failure(err: &FetchError) -> FailureType {
    if err.is_transport() {
        return FailureType::Unknown;
    }
    match err {
        FetchError::Upstream { status: 404, .. } => FailureType::Expected,
        FetchError::Upstream { status, .. } if *status >= 500 => FailureType::Unknown,
        _ => FailureType::Unexpected,
    }
}

/// Log a fetch failure with automatic classification
pub fn log_fetch_failure(source: DataSource, id: &str, operation: &str, err: &FetchError) {
    let failure_type = classify_failure(err);
    let source = source.to_string();

    match failure_type {
        FailureType::Expected => {
            debug!(%source, id, %failure_type, "{} failed: {}", operation, err)
        }
        FailureType::Unexpected => {
            error!(%source, id, %failure_type, "{} failed: {}", operation, err)
        }
        FailureType::Unknown => {
            warn!(%source, id, %failure_type, "{} failed: {}", operation, err)
        }
    }
}

// ---------------------------------------------------------------------------
// Subscriber
// ---------------------------------------------------------------------------

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
