/// Summarizer prompts, one per region.
///
/// A prompt carries everything fetched for the region: offices checked,
/// active alerts with their descriptions, each office's forecast discussion
/// and any gauges forecast above flood stage, followed by formatting rules
/// for the HTML paragraph the summarizer must return.

use indexmap::IndexMap;

use crate::model::{AlertRecord, GaugeRecord, RegionReport, WeatherDocument};

pub const NO_ALERTS_TEXT: &str = "No active alerts.";
pub const NO_FLOODING_TEXT: &str =
    "No rivers are currently forecast above flood stage in the monitored areas for this region.";

fn alerts_section(alerts: &[AlertRecord]) -> String {
    if alerts.is_empty() {
        return NO_ALERTS_TEXT.to_string();
    }
    alerts
        .iter()
        .map(|a| {
            format!(
                "- {}: {}",
                a.headline.as_deref().unwrap_or("No headline"),
                a.description.as_deref().unwrap_or("No description")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn gauge_line(g: &GaugeRecord) -> String {
    let place = match (&g.location_name, &g.waterbody) {
        (Some(location), Some(water)) => format!(" ({}, {})", location, water),
        (Some(location), None) => format!(" ({})", location),
        (None, Some(water)) => format!(" ({})", water),
        (None, None) => String::new(),
    };
    format!(
        "- {}{}: forecast {} ft, flood stage {} ft, status {}",
        g.gauge_id, place, g.forecast_value, g.flood_stage_value, g.status
    )
}

fn rivers_section(gauges: &[GaugeRecord]) -> String {
    if gauges.is_empty() {
        return NO_FLOODING_TEXT.to_string();
    }
    gauges.iter().map(gauge_line).collect::<Vec<_>>().join("\n")
}

/// Builds the summarizer prompt for one region.
pub fn build_prompt(report: &RegionReport) -> String {
    let name = &report.region.name;
    let offices = report.region.offices.join(", ");

    let mut discussions = String::new();
    if report.discussions.is_empty() {
        discussions.push_str("No forecast discussions available.\n");
    }
    for d in &report.discussions {
        discussions.push_str(&format!(
            "\n---\nDiscussion from {} ({}):\n{}\n",
            d.office_id.to_uppercase(),
            d.fetch_status,
            d.text.trim_end()
        ));
    }

    format!(
        r##"You are an expert meteorologist writing a 5-Day Outlook for an emergency management agency.
Synthesize the data below for {name} into a scannable, extremely concise summary.

GUIDELINES:
1. Format: write a single HTML paragraph (<p>...</p>) starting with <strong>{name}:</strong>.
2. Content: actionable intelligence only. Name the primary threats and where they are. No filler.
3. If there are no significant hazards, write ONLY: <strong>{name}:</strong> All offices ({offices}) confirm no significant weather threats are forecast.
4. Emphasis: <span style="color:#cc0000; font-weight:bold;">WARNING</span>, <span style="color:#e67300; font-weight:bold;">WATCH</span> or <span style="color:#ffcc00; font-weight:bold;">ADVISORY</span> where critical. Do NOT use markdown.

DATA FOR {name}:
Offices: {offices}

Active Alerts:
{alerts}

River Conditions:
{rivers}

Forecast Discussions:
{discussions}"##,
        name = name,
        offices = offices,
        alerts = alerts_section(&report.alerts),
        rivers = rivers_section(&report.gauges),
        discussions = discussions,
    )
}

/// Prompts for every region, keyed by region name in document order.
pub fn build_prompts(doc: &WeatherDocument) -> IndexMap<String, String> {
    doc.regions
        .iter()
        .map(|(name, report)| (name.clone(), build_prompt(report)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
