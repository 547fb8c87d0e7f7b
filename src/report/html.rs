/// HTML briefing page.
///
/// Layout, top to bottom: generation time, NHC tropical outlook box,
/// "State-by-State Threats" with one summary paragraph per region (plus its
/// active alerts and flooding gauges), then recommendations derived from the
/// alert event names. Every string that came from an upstream API is escaped;
/// region summaries are inserted as-is because they already are HTML.

use chrono_tz::Tz;
use html_escape::encode_text;
use indexmap::IndexMap;

use crate::model::{AlertRecord, FetchStatus, GaugeRecord, RegionReport, TropicalOutlook, WeatherDocument};

const TEMPLATE: &str = include_str!("template.html");

/// Times on the page are shown in the agency's local time.
pub const REPORT_TIMEZONE: Tz = chrono_tz::America::New_York;

pub const FALLBACK_RECOMMENDATION: &str = "Monitor local conditions.";

/// Event keyword to recommended action, matched case-insensitively against
/// the alert event name. Output follows this order.
const RECOMMENDATIONS: &[(&str, &str)] = &[
    ("Flood", "Do not drive through flooded roadways."),
    ("Rip Current", "Avoid swimming in hazardous surf conditions."),
    ("Tornado", "Monitor local weather and be prepared to take shelter."),
    ("Thunderstorm", "Seek shelter during thunderstorms."),
    ("Hurricane", "Follow instructions from local emergency management."),
    ("Heat", "Stay hydrated and avoid strenuous activity during peak heat."),
];

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Display level derived from the alert's CAP severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
    Watch,
    Advisory,
}

impl AlertLevel {
    pub fn from_severity(severity: Option<&str>) -> Self {
        match severity {
            Some("Extreme") | Some("Severe") => AlertLevel::Warning,
            Some("Moderate") => AlertLevel::Watch,
            _ => AlertLevel::Advisory,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AlertLevel::Warning => "#cc0000",
            AlertLevel::Watch => "#e67300",
            AlertLevel::Advisory => "#ffcc00",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertLevel::Warning => "WARNING",
            AlertLevel::Watch => "WATCH",
            AlertLevel::Advisory => "ADVISORY",
        }
    }
}

/// One `<li>` for an alert.
pub fn format_alert(alert: &AlertRecord) -> String {
    let level = AlertLevel::from_severity(alert.severity.as_deref());
    format!(
        r#"<li><span style="color:{}; font-weight:bold;">{}</span>: {} for {}.<br><i style="font-size:13px;">{}</i></li>"#,
        level.color(),
        level.label(),
        encode_text(alert.event.as_deref().unwrap_or("Unknown Event")),
        encode_text(alert.area_description.as_deref().unwrap_or("Unknown area")),
        encode_text(alert.headline.as_deref().unwrap_or("No headline available.")),
    )
}

/// Recommended actions for a set of alerts, deduplicated, in table order.
/// Falls back to a single generic line when nothing matches.
pub fn recommendations<'a, I>(alerts: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a AlertRecord>,
{
    let events: Vec<String> = alerts
        .into_iter()
        .filter_map(|a| a.event.as_deref())
        .map(str::to_lowercase)
        .collect();

    let recs: Vec<&'static str> = RECOMMENDATIONS
        .iter()
        .filter(|(keyword, _)| {
            let keyword = keyword.to_lowercase();
            events.iter().any(|event| event.contains(&keyword))
        })
        .map(|(_, rec)| *rec)
        .collect();

    if recs.is_empty() { vec![FALLBACK_RECOMMENDATION] } else { recs }
}

fn recommendations_html(recs: &[&str]) -> String {
    let items: String = recs.iter().map(|r| format!("<li>{}</li>", r)).collect();
    format!(
        r##"<h3 style="color:#990000; font-weight:bold;">Recommendations</h3>
<h4 style="color:#990000; font-weight:bold;">Immediate Actions</h4>
<ul>{}</ul>
<h4 style="color:#990000; font-weight:bold;">5-Day Monitoring</h4>
<ul><li>Monitor NWS local offices for new or updated advisories.</li><li>Track NHC updates.</li></ul>
"##,
        items
    )
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Tropical outlook box. Empty when the outlook was not fetched.
pub fn tropical_html(outlook: Option<&TropicalOutlook>) -> String {
    let Some(outlook) = outlook else {
        return String::new();
    };

    let details: String = outlook
        .details
        .iter()
        .map(|d| format!("<li>{}</li>", encode_text(d)))
        .collect();
    let details = if details.is_empty() {
        String::new()
    } else {
        format!(r#"<ul style="margin:0 0 8px;">{}</ul>"#, details)
    };

    format!(
        r##"<div style="background-color:#f0e8e4; border-left:4px solid #7a1d1d; padding:15px; margin-bottom:20px;">
<h3 style="color:#7a1d1d; font-weight:bold; font-size:18px; margin:0 0 8px;">Tropical Weather Outlook</h3>
<p style="color:#000000; margin:0 0 5px;">{}</p>
{}<div style="text-align:center;">
<div style="display:inline-block; background-color:#7a1d1d; color:#ffffff; padding:2px 8px; font-size:30px; font-weight:bold;">
Formation Chance (7-Day): <span style="font-size:30px;">{}%</span>
</div></div></div>
"##,
        encode_text(&outlook.summary),
        details,
        outlook.formation_chance_7day
    )
}

fn alerts_html(alerts: &[AlertRecord]) -> String {
    if alerts.is_empty() {
        return String::new();
    }
    let items: String = alerts.iter().map(format_alert).collect();
    format!(
        r#"<div style="margin-top:5px; margin-left:15px; border-left: 2px solid #cc0000; padding-left:8px;"><strong style="font-size:15px;">Active Alerts:</strong><ul>{}</ul></div>"#,
        items
    )
}

fn gauges_html(gauges: &[GaugeRecord]) -> String {
    if gauges.is_empty() {
        return String::new();
    }
    let rows: String = gauges
        .iter()
        .map(|g| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                encode_text(&g.gauge_id),
                encode_text(g.location_name.as_deref().or(g.waterbody.as_deref()).unwrap_or("")),
                encode_text(&g.forecast_value),
                encode_text(&g.flood_stage_value),
                encode_text(&g.status),
            )
        })
        .collect();
    format!(
        r#"<table class="gauges"><tr><th>Gauge</th><th>Location</th><th>Forecast (ft)</th><th>Flood stage (ft)</th><th>Status</th></tr>{}</table>"#,
        rows
    )
}

/// Summary paragraph for a region when no summarizer output is available.
/// Built from the fetched counts only, so it is deterministic.
pub fn fallback_summary(report: &RegionReport) -> String {
    let name = encode_text(&report.region.name);
    let offices = encode_text(&report.region.offices.join(", ")).into_owned();

    let mut text = if report.alerts.is_empty() && report.gauges.is_empty() {
        format!(
            "<strong>{}:</strong> No active alerts or river gauges above flood stage reported for offices {}.",
            name, offices
        )
    } else {
        format!(
            "<strong>{}:</strong> {} active alert(s) and {} gauge(s) forecast above flood stage. Offices checked: {}.",
            name,
            report.alerts.len(),
            report.gauges.len(),
            offices
        )
    };

    let missing: Vec<&str> = report
        .discussions
        .iter()
        .filter(|d| d.fetch_status != FetchStatus::Ok)
        .map(|d| d.office_id.as_str())
        .collect();
    if !missing.is_empty() {
        text.push_str(&format!(
            " Forecast discussions unavailable from {}.",
            encode_text(&missing.join(", "))
        ));
    }

    format!("<p>{}</p>", text)
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Renders the complete page. `summaries` maps region name to an HTML
/// paragraph; regions without one get `fallback_summary`.
pub fn render_report(doc: &WeatherDocument, summaries: &IndexMap<String, String>) -> String {
    let local = doc.generated_at.with_timezone(&REPORT_TIMEZONE);
    let mut content = format!(
        r##"<p style="color:#000000; font-style:italic;">Weather.gov data checked at {}.</p>
<h2 style="color:#990000; font-weight:bold;">5-Day Outlook for {}</h2>
"##,
        local.format("%-I:%M %p %Z, %B %-d, %Y"),
        local.format("%B %-d, %Y")
    );

    content.push_str(&tropical_html(doc.tropical.as_ref()));
    content.push_str(r##"<h3 style="color:#990000; font-weight:bold;">State-by-State Threats</h3>"##);
    content.push('\n');

    for (name, report) in &doc.regions {
        match summaries.get(name) {
            Some(summary) => content.push_str(summary),
            None => content.push_str(&fallback_summary(report)),
        }
        content.push_str(&alerts_html(&report.alerts));
        content.push_str(&gauges_html(&report.gauges));
        content.push_str("<br><br>\n");
    }

    content.push_str(&recommendations_html(&recommendations(doc.all_alerts())));

    TEMPLATE
        .replace("{{{TIMESTAMP}}}", &doc.generated_at.timestamp().to_string())
        .replace("{{{CONTENT}}}", &content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
