/// National Hurricane Center tropical weather outlook.
///
/// NHC publishes the Atlantic 7-day outlook only as an HTML page:
///   https://www.nhc.noaa.gov/gtwo.php?basin=atlc&fdays=7
///
/// Each disturbance is rendered as a collapsible `<button id="xshcontentsNbtn">`
/// whose text ends in "7-Day Formation Chance: Low (20%)". On quiet days there
/// are no such buttons and the page states that formation "is not expected".
/// This parsing depends on the page layout and may need updating if NHC
/// changes it.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use crate::client::EndpointClient;
use crate::logging::{DataSource, log_fetch_failure};
use crate::model::TropicalOutlook;

pub const QUIET_SUMMARY: &str = "No tropical cyclone activity is expected during the next 7 days.";
pub const UNAVAILABLE_SUMMARY: &str = "Could not retrieve NHC Tropical Weather Outlook.";

static DISTURBANCE_BUTTON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<button[^>]*id="xshcontents\d+btn"[^>]*>(.*?)</button>"#)
        .expect("disturbance pattern is valid")
});

static FORMATION_CHANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)7-Day Formation Chance:\s*\w+\s*\((\d{1,3})%\)")
        .expect("formation chance pattern is valid")
});

static NOT_EXPECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Tropical cyclone formation is not expected[^<.]*\.?")
        .expect("quiet outlook pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

fn strip_tags(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Extracts the outlook from the NHC page.
pub fn parse_outlook(html: &str) -> TropicalOutlook {
    let mut outlook = TropicalOutlook {
        summary: QUIET_SUMMARY.to_string(),
        formation_chance_7day: 0,
        details: Vec::new(),
        error: None,
    };

    let buttons: Vec<String> = DISTURBANCE_BUTTON
        .captures_iter(html)
        .map(|c| strip_tags(&c[1]))
        .collect();

    if buttons.is_empty() {
        if let Some(m) = NOT_EXPECTED.find(html) {
            outlook.summary = m.as_str().trim().to_string();
        }
        return outlook;
    }

    let mut highest = 0u8;
    for text in buttons {
        let Some(chance) = FORMATION_CHANCE
            .captures(&text)
            .and_then(|c| c[1].parse::<u8>().ok())
        else {
            continue;
        };
        highest = highest.max(chance.min(100));
        outlook.details.push(text);
    }

    if highest > 0 {
        outlook.summary = format!(
            "One or more disturbances identified with up to {}% chance of formation.",
            highest
        );
        outlook.formation_chance_7day = highest;
    }

    outlook
}

/// Retrieves the Atlantic 7-day outlook. Never fails: a fetch error yields an
/// outlook whose `error` field carries the cause.
pub struct OutlookFetcher<'a, C> {
    client: &'a C,
    url: &'a str,
    timeout: Duration,
}

impl<'a, C: EndpointClient> OutlookFetcher<'a, C> {
    pub fn new(client: &'a C, url: &'a str, timeout: Duration) -> Self {
        Self { client, url, timeout }
    }

    pub async fn fetch(&self) -> TropicalOutlook {
        match self.client.fetch_text(self.url, self.timeout).await {
            Ok(html) => {
                let outlook = parse_outlook(&html);
                debug!(chance = outlook.formation_chance_7day, "tropical outlook");
                outlook
            }
            Err(err) => {
                log_fetch_failure(DataSource::Nhc, "atlc", "outlook fetch", &err);
                TropicalOutlook {
                    summary: UNAVAILABLE_SUMMARY.to_string(),
                    formation_chance_7day: 0,
                    details: Vec::new(),
                    error: Some(err.to_string()),
                }
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
    use crate::config::NHC_OUTLOOK_URL;
    use crate::ingest::fixtures::*;
    use crate::replay::ReplayClient;

    #[test]
    fn test_active_outlook_takes_highest_chance() {
        let outlook = parse_outlook(fixture_nhc_active_html());

        assert_eq!(outlook.formation_chance_7day, 60);
        assert_eq!(outlook.details.len(), 2);
        assert!(outlook.details[0].contains("Central Tropical Atlantic"));
        assert!(!outlook.details[0].contains("<br>"), "tags should be stripped");
        assert!(outlook.summary.contains("60%"), "got: {}", outlook.summary);
        assert!(outlook.error.is_none());
    }

    #[test]
    fn test_quiet_outlook_uses_page_text() {
        let outlook = parse_outlook(fixture_nhc_quiet_html());

        assert_eq!(outlook.formation_chance_7day, 0);
        assert!(outlook.details.is_empty());
        assert_eq!(
            outlook.summary,
            "Tropical cyclone formation is not expected during the next 7 days."
        );
    }

    #[test]
    fn test_unrecognized_page_keeps_default_summary() {
        let outlook = parse_outlook("<html><body>maintenance</body></html>");
        assert_eq!(outlook.summary, QUIET_SUMMARY);
        assert_eq!(outlook.formation_chance_7day, 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_in_outlook() {
        let client = ReplayClient::new().with_status(NHC_OUTLOOK_URL, 503);
        let outlook = OutlookFetcher::new(&client, NHC_OUTLOOK_URL, Duration::from_secs(15))
            .fetch()
            .await;

        assert_eq!(outlook.summary, UNAVAILABLE_SUMMARY);
        assert!(outlook.error.as_deref().unwrap_or_default().contains("503"));
    }
}
