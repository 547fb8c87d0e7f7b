/// National Water Prediction Service (NWPS) gauge client.
///
/// Queries every gauge in a state and keeps the ones whose primary forecast
/// stage is strictly above the primary flood stage:
///   https://api.water.noaa.gov/nwps/v1/gauges?state={code}
///
/// NWPS returns stage values as strings (sometimes numbers). Strings are kept
/// as sent, numbers are re-rendered by serde_json. A gauge whose values are
/// missing or non-numeric is skipped, never reported as an error.

use serde_json::Value;
use std::cmp::Ordering;
use std::time::Duration;
use tracing::debug;

use crate::client::EndpointClient;
use crate::logging::{DataSource, log_fetch_failure};
use crate::model::{FetchError, GaugeRecord};

pub const DEFAULT_GAUGE_STATUS: &str = "forecasted flood";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub fn build_gauges_url(base: &str, region_code: &str) -> String {
    format!(
        "{}/gauges?state={}",
        base.trim_end_matches('/'),
        urlencoding::encode(region_code)
    )
}

// ---------------------------------------------------------------------------
// Payload extraction
// ---------------------------------------------------------------------------

/// A stage value in text form (trimmed string, or canonical JSON number) and
/// as a number.
fn stage_value(gauge: &Value, section: &str) -> Option<(String, f64)> {
    let raw = gauge.get(section)?.get("primary")?.get("value")?;
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let parsed: f64 = text.parse().ok()?;
    Some((text, parsed))
}

/// Builds a record for one gauge if its forecast exceeds flood stage.
pub fn flooding_gauge(gauge_id: &str, region_code: &str, gauge: &Value) -> Option<GaugeRecord> {
    let (forecast_value, forecast) = stage_value(gauge, "forecast")?;
    let (flood_stage_value, flood_stage) = stage_value(gauge, "flood")?;

    // NaN compares as neither greater nor smaller and is skipped here too.
    if forecast.partial_cmp(&flood_stage) != Some(Ordering::Greater) {
        return None;
    }

    let text = |key: &str| gauge.get(key).and_then(Value::as_str).map(str::to_string);

    Some(GaugeRecord {
        gauge_id: gauge_id.to_string(),
        region_code: region_code.to_string(),
        location_name: text("location"),
        waterbody: text("waterbody"),
        forecast_value,
        flood_stage_value,
        status: text("status").unwrap_or_else(|| DEFAULT_GAUGE_STATUS.to_string()),
    })
}

/// Filters a gauge map down to gauges forecast above flood stage, in
/// payload order.
///
/// # Errors
/// `FetchError::Parse` if the payload is not a JSON object.
pub fn parse_flooding_gauges(
    url: &str,
    region_code: &str,
    payload: &Value,
) -> Result<Vec<GaugeRecord>, FetchError> {
    let gauges = payload
        .as_object()
        .ok_or_else(|| FetchError::parse(url, "expected an object of gauge id to gauge data"))?;

    Ok(gauges
        .iter()
        .filter_map(|(id, gauge)| flooding_gauge(id, region_code, gauge))
        .collect())
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Retrieves gauges forecast to exceed flood stage for one region.
pub struct GaugeFetcher<'a, C> {
    client: &'a C,
    base_url: &'a str,
    timeout: Duration,
    /// Pause after each request, successful or not.
    delay: Duration,
}

impl<'a, C: EndpointClient> GaugeFetcher<'a, C> {
    pub fn new(client: &'a C, base_url: &'a str, timeout: Duration, delay: Duration) -> Self {
        Self { client, base_url, timeout, delay }
    }

    /// Empty on any failure.
    pub async fn fetch(&self, region_code: &str) -> Vec<GaugeRecord> {
        let url = build_gauges_url(self.base_url, region_code);
        let result = match self.client.fetch(&url, self.timeout).await {
            Ok(payload) => parse_flooding_gauges(&url, region_code, &payload),
            Err(err) => Err(err),
        };

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match result {
            Ok(gauges) => {
                debug!(region_code, count = gauges.len(), "gauges above flood stage");
                gauges
            }
            Err(err) => {
                log_fetch_failure(DataSource::Nwps, region_code, "gauge fetch", &err);
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NWPS_API_BASE;
    use crate::ingest::fixtures::*;
    use crate::replay::ReplayClient;
    use serde_json::json;

    const T: Duration = Duration::from_secs(45);

    fn gauge(forecast: Value, flood: Value) -> Value {
        json!({
            "forecast": { "primary": { "value": forecast } },
            "flood": { "primary": { "value": flood } },
            "location": "Somewhere"
        })
    }

    #[test]
    fn test_gauges_url_uses_state_filter() {
        assert_eq!(
            build_gauges_url(NWPS_API_BASE, "FL"),
            "https://api.water.noaa.gov/nwps/v1/gauges?state=FL"
        );
    }

    #[test]
    fn test_forecast_above_flood_stage_is_kept() {
        let record = flooding_gauge("G1", "TS", &gauge(json!("12.5"), json!("10.0")))
            .expect("12.5 > 10.0 should produce a record");
        assert_eq!(record.forecast_value, "12.5");
        assert_eq!(record.flood_stage_value, "10.0");
        assert_eq!(record.status, DEFAULT_GAUGE_STATUS, "missing status gets the default");
    }

    #[test]
    fn test_forecast_equal_to_flood_stage_is_skipped() {
        assert!(flooding_gauge("G1", "TS", &gauge(json!("10.0"), json!("10"))).is_none());
    }

    #[test]
    fn test_forecast_below_flood_stage_is_skipped() {
        assert!(flooding_gauge("G1", "TS", &gauge(json!("9.99"), json!("10.0"))).is_none());
    }

    #[test]
    fn test_unparseable_values_are_skipped() {
        assert!(flooding_gauge("G1", "TS", &gauge(json!("high"), json!("10.0"))).is_none());
        assert!(flooding_gauge("G1", "TS", &gauge(json!("12.0"), json!(""))).is_none());
        assert!(flooding_gauge("G1", "TS", &gauge(json!(null), json!("10.0"))).is_none());
        assert!(flooding_gauge("G1", "TS", &gauge(json!("NaN"), json!("10.0"))).is_none());
        assert!(flooding_gauge("G1", "TS", &json!({"location": "bare"})).is_none());
    }

    #[test]
    fn test_whitespace_around_values_is_ignored() {
        let record = flooding_gauge("G1", "TS", &gauge(json!(" 12.5 "), json!("10.0")))
            .expect("padded value should still parse");
        assert_eq!(record.forecast_value, "12.5");
    }

    #[test]
    fn test_numeric_values_use_canonical_number_text() {
        let payload: Value = serde_json::from_str(
            r#"{"forecast": {"primary": {"value": 12.50}}, "flood": {"primary": {"value": 10}}}"#,
        )
        .unwrap();
        let record = flooding_gauge("G1", "TS", &payload).expect("12.50 > 10 should produce a record");
        assert_eq!(record.forecast_value, "12.5");
        assert_eq!(record.flood_stage_value, "10");
    }

    #[test]
    fn test_fixture_keeps_only_flooding_gauges() {
        let records = parse_flooding_gauges("u", "FL", &fixture_gauges_json())
            .expect("fixture should parse");
        let ids: Vec<&str> = records.iter().map(|r| r.gauge_id.as_str()).collect();

        assert_eq!(ids.len(), 2, "got {:?}", ids);
        assert!(ids.contains(&"RVRF1"));
        assert!(ids.contains(&"NUMF1"));

        let peace = records.iter().find(|r| r.gauge_id == "RVRF1").unwrap();
        assert_eq!(peace.location_name.as_deref(), Some("Peace River at Arcadia"));
        assert_eq!(peace.waterbody.as_deref(), Some("Peace River"));
        assert_eq!(peace.status, "minor");
        assert_eq!(peace.region_code, "FL");

        let numeric = records.iter().find(|r| r.gauge_id == "NUMF1").unwrap();
        assert_eq!(numeric.forecast_value, "21.5");
        assert_eq!(numeric.flood_stage_value, "20");
    }

    #[test]
    fn test_non_object_payload_is_parse_error() {
        let result = parse_flooding_gauges("u", "FL", &json!([1, 2, 3]));
        assert!(matches!(result, Err(FetchError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty_list() {
        let url = build_gauges_url(NWPS_API_BASE, "FL");
        let client = ReplayClient::new().with_timeout(&url);
        let fetcher = GaugeFetcher::new(&client, NWPS_API_BASE, T, Duration::ZERO);
        assert!(fetcher.fetch("FL").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_waits_polite_delay_after_request() {
        let url = build_gauges_url(NWPS_API_BASE, "FL");
        let client = ReplayClient::new().with_json(&url, json!({}));
        let fetcher = GaugeFetcher::new(&client, NWPS_API_BASE, T, Duration::from_millis(50));

        let start = std::time::Instant::now();
        let gauges = fetcher.fetch("FL").await;
        assert!(gauges.is_empty());
        assert!(start.elapsed() >= Duration::from_millis(50), "delay should be honored");
    }

    #[tokio::test]
    async fn test_fetch_waits_polite_delay_after_failed_request() {
        let url = build_gauges_url(NWPS_API_BASE, "FL");
        let client = ReplayClient::new().with_status(&url, 500);
        let fetcher = GaugeFetcher::new(&client, NWPS_API_BASE, T, Duration::from_millis(50));

        let start = std::time::Instant::now();
        let gauges = fetcher.fetch("FL").await;
        assert!(gauges.is_empty());
        assert_eq!(client.request_count(), 1);
        assert!(start.elapsed() >= Duration::from_millis(50), "delay applies after failures too");
    }
}
