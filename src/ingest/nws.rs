/// api.weather.gov client: Area Forecast Discussions and active alerts.
///
/// Handles URL construction and payload extraction for:
///   https://api.weather.gov/products/types/AFD/locations/{office}
///   https://api.weather.gov/alerts/active?area={code}
///
/// Both fetchers absorb every upstream failure. A discussion fetch always
/// yields a `DiscussionRecord` (possibly with `no_data`/`error` status); an
/// alert fetch yields an empty list when alerts could not be retrieved.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::client::EndpointClient;
use crate::logging::{DataSource, log_fetch_failure};
use crate::model::{AlertRecord, DiscussionRecord, FetchError};

pub const NO_PRODUCT_TEXT: &str = "No discussion data in expected format.";
pub const NO_PRODUCT_BODY_TEXT: &str = "No discussion text found.";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the "latest AFD products for this office" list URL.
pub fn build_afd_list_url(base: &str, office_id: &str) -> String {
    format!(
        "{}/products/types/AFD/locations/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(office_id)
    )
}

/// Builds the active-alerts URL filtered to one area code.
pub fn build_alerts_url(base: &str, region_code: &str) -> String {
    format!(
        "{}/alerts/active?area={}",
        base.trim_end_matches('/'),
        urlencoding::encode(region_code)
    )
}

// ---------------------------------------------------------------------------
// Payload extraction
// ---------------------------------------------------------------------------

/// URL of the newest product in an AFD list payload, if there is one.
pub fn latest_product_url(list: &Value) -> Option<&str> {
    list.get("@graph")?.as_array()?.first()?.get("@id")?.as_str()
}

/// Flattens an alerts FeatureCollection into records, preserving API order.
///
/// # Errors
/// `FetchError::Parse` if `features` is missing or not an array.
pub fn parse_alerts(url: &str, payload: &Value) -> Result<Vec<AlertRecord>, FetchError> {
    let features = payload
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::parse(url, "missing 'features' array"))?;

    Ok(features.iter().map(alert_from_feature).collect())
}

fn alert_from_feature(feature: &Value) -> AlertRecord {
    let props = feature.get("properties");
    let text = |key: &str| {
        props
            .and_then(|p| p.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    AlertRecord {
        event: text("event"),
        headline: text("headline"),
        description: text("description"),
        severity: text("severity"),
        area_description: text("areaDesc"),
        raw_payload: feature.clone(),
    }
}

// ---------------------------------------------------------------------------
// Fetchers
// ---------------------------------------------------------------------------

/// Retrieves the most recent forecast discussion for one office.
pub struct DiscussionFetcher<'a, C> {
    client: &'a C,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a, C: EndpointClient> DiscussionFetcher<'a, C> {
    pub fn new(client: &'a C, base_url: &'a str, timeout: Duration) -> Self {
        Self { client, base_url, timeout }
    }

    /// Never fails: upstream problems become `no_data` or `error` records.
    pub async fn fetch(&self, office_id: &str) -> DiscussionRecord {
        match self.try_fetch(office_id).await {
            Ok(record) => record,
            Err(err) => {
                log_fetch_failure(DataSource::Nws, office_id, "discussion fetch", &err);
                DiscussionRecord::error(office_id, &err)
            }
        }
    }

    async fn try_fetch(&self, office_id: &str) -> Result<DiscussionRecord, FetchError> {
        let list_url = build_afd_list_url(self.base_url, office_id);
        let list = self.client.fetch(&list_url, self.timeout).await?;

        let Some(product_url) = latest_product_url(&list) else {
            debug!(office_id, "no AFD product listed");
            return Ok(DiscussionRecord::no_data(office_id, NO_PRODUCT_TEXT));
        };

        let product = self.client.fetch(product_url, self.timeout).await?;
        match product.get("productText").and_then(Value::as_str) {
            Some(text) => Ok(DiscussionRecord::ok(office_id, text.to_string())),
            None => {
                debug!(office_id, product_url, "AFD product has no productText");
                Ok(DiscussionRecord::no_data(office_id, NO_PRODUCT_BODY_TEXT))
            }
        }
    }
}

/// Retrieves every active alert for one area code.
pub struct AlertFetcher<'a, C> {
    client: &'a C,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a, C: EndpointClient> AlertFetcher<'a, C> {
    pub fn new(client: &'a C, base_url: &'a str, timeout: Duration) -> Self {
        Self { client, base_url, timeout }
    }

    /// Empty on failure: "could not confirm" and "none in effect" look the
    /// same to callers.
    pub async fn fetch(&self, region_code: &str) -> Vec<AlertRecord> {
        let url = build_alerts_url(self.base_url, region_code);
        let result = match self.client.fetch(&url, self.timeout).await {
            Ok(payload) => parse_alerts(&url, &payload),
            Err(err) => Err(err),
        };

        match result {
            Ok(alerts) => {
                debug!(region_code, count = alerts.len(), "active alerts");
                alerts
            }
            Err(err) => {
                log_fetch_failure(DataSource::Nws, region_code, "alert fetch", &err);
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
