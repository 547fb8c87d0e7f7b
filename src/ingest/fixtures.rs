/// Test fixtures: representative payloads from the upstream APIs.
///
/// These are structurally complete but trimmed to the fields the parsers
/// read, mirroring what the live endpoints return:
///
/// AFD product list (`/products/types/AFD/locations/{office}`):
///   `@graph[]` - newest first
///     `.@id`     - product URL to follow for the full text
///     `.issuanceTime`
///
/// AFD product (`/products/{id}`):
///   `.productText` - the discussion as one preformatted string
///
/// Active alerts (`/alerts/active?area={code}`), GeoJSON:
///   `features[].properties.{event, headline, description, severity, areaDesc}`
///
/// NWPS gauges (`/gauges?state={code}`):
///   object of gauge id → `{forecast.primary.value, flood.primary.value,
///   location, waterbody, status}`. Stage values arrive as strings.

#[cfg(test)]
pub(crate) const MFL_PRODUCT_URL: &str =
    "https://api.weather.gov/products/6f1c9b6e-0d4e-4f5e-9a8c-2c9b3e1a7d10";

/// AFD list for Miami with two products; only the first should be followed.
#[cfg(test)]
pub(crate) fn fixture_afd_list_json() -> serde_json::Value {
    serde_json::json!({
      "@context": { "@version": "1.1" },
      "@graph": [
        {
          "@id": MFL_PRODUCT_URL,
          "id": "6f1c9b6e-0d4e-4f5e-9a8c-2c9b3e1a7d10",
          "wmoCollectiveId": "FXUS62",
          "issuingOffice": "KMFL",
          "issuanceTime": "2024-09-10T19:42:00+00:00",
          "productCode": "AFD",
          "productName": "Area Forecast Discussion"
        },
        {
          "@id": "https://api.weather.gov/products/older-product",
          "id": "older-product",
          "issuingOffice": "KMFL",
          "issuanceTime": "2024-09-10T07:31:00+00:00",
          "productCode": "AFD",
          "productName": "Area Forecast Discussion"
        }
      ]
    })
}

#[cfg(test)]
pub(crate) fn fixture_afd_product_json() -> serde_json::Value {
    serde_json::json!({
      "@id": MFL_PRODUCT_URL,
      "issuingOffice": "KMFL",
      "productCode": "AFD",
      "productText": "000\nFXUS62 KMFL 101942\nAFDMFL\n\nArea Forecast Discussion\nNational Weather Service Miami FL\n\n.SHORT TERM...\nScattered thunderstorms this afternoon with locally heavy rainfall.\n"
    })
}

/// Two alerts for Florida, most severe first as the API orders them.
#[cfg(test)]
pub(crate) fn fixture_alerts_json() -> serde_json::Value {
    serde_json::json!({
      "type": "FeatureCollection",
      "features": [
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.a1",
          "type": "Feature",
          "properties": {
            "areaDesc": "Coastal Miami-Dade, FL; Coastal Broward, FL",
            "severity": "Severe",
            "event": "Flood Warning",
            "headline": "Flood Warning issued September 10 at 3:42PM EDT by NWS Miami FL",
            "description": "Flooding caused by excessive rainfall is expected."
          }
        },
        {
          "id": "https://api.weather.gov/alerts/urn:oid:2.49.0.1.840.0.a2",
          "type": "Feature",
          "properties": {
            "areaDesc": "Coastal Palm Beach, FL",
            "severity": "Moderate",
            "event": "Rip Current Statement",
            "headline": "Rip Current Statement issued September 10 at 4:01AM EDT by NWS Miami FL"
          }
        }
      ],
      "title": "Current watches, warnings, and advisories for Florida"
    })
}

/// Gauges for one state covering every filter branch:
///   RVRF1 - forecast above flood stage (kept)
///   EQLF1 - forecast equal to flood stage (skipped)
///   LOWF1 - forecast below flood stage (skipped)
///   MSGF1 - forecast missing (skipped)
///   BADF1 - non-numeric flood stage (skipped)
///   NUMF1 - numeric JSON values above flood stage (kept)
#[cfg(test)]
pub(crate) fn fixture_gauges_json() -> serde_json::Value {
    serde_json::json!({
      "RVRF1": {
        "forecast": { "primary": { "value": "14.2", "units": "ft" } },
        "flood": { "primary": { "value": "12.0", "units": "ft" } },
        "location": "Peace River at Arcadia",
        "waterbody": "Peace River",
        "status": "minor"
      },
      "EQLF1": {
        "forecast": { "primary": { "value": "10.0" } },
        "flood": { "primary": { "value": "10.0" } },
        "location": "Equal Creek",
        "waterbody": "Equal Creek",
        "status": "action"
      },
      "LOWF1": {
        "forecast": { "primary": { "value": "3.1" } },
        "flood": { "primary": { "value": "9.0" } },
        "location": "Low River",
        "waterbody": "Low River"
      },
      "MSGF1": {
        "flood": { "primary": { "value": "9.0" } },
        "location": "No Forecast Creek"
      },
      "BADF1": {
        "forecast": { "primary": { "value": "11.0" } },
        "flood": { "primary": { "value": "N/A" } },
        "location": "Unrated Bayou"
      },
      "NUMF1": {
        "forecast": { "primary": { "value": 21.5 } },
        "flood": { "primary": { "value": 20 } },
        "location": "Withlacoochee at Croom"
      }
    })
}

/// NHC outlook page with two disturbances (trimmed HTML).
#[cfg(test)]
pub(crate) fn fixture_nhc_active_html() -> &'static str {
    r#"<html><body>
<div class="textproduct">
<button id="xshcontents1btn" class="collapsible">
  1. Central Tropical Atlantic (AL91):<br>
  * Formation chance through 48 hours...low...10 percent.<br>
  7-Day Formation Chance: Low (20%)
</button>
<button id="xshcontents2btn" class="collapsible">
  2. Eastern Tropical Atlantic:<br>
  7-Day Formation Chance: Medium (60%)
</button>
</div>
</body></html>"#
}

/// NHC outlook page on a quiet day.
#[cfg(test)]
pub(crate) fn fixture_nhc_quiet_html() -> &'static str {
    r#"<html><body>
<pre>
For the North Atlantic...Caribbean Sea and the Gulf of America:

Tropical cyclone formation is not expected during the next 7 days.

$$
Forecaster Blake
</pre>
</body></html>"#
}
