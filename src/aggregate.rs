/// Per-region aggregation: one `RegionReport` from three independent sources.
///
/// For a region the aggregator needs one discussion per forecast office, the
/// active alerts for the region code and the gauges above flood stage. Under
/// `FetchStrategy::Concurrent` all office requests are issued before any is
/// awaited, and the discussion group, alert fetch and gauge fetch run side by
/// side behind a join. Nothing short-circuits: a failing office cannot stop
/// the alert or gauge fetch, and the report waits for all three.
///
/// Discussions come back in office order whatever order the requests finish.

use futures::future::join_all;
use tracing::info;

use crate::client::EndpointClient;
use crate::config::{Endpoints, FetchStrategy, ServiceSettings};
use crate::ingest::{AlertFetcher, DiscussionFetcher, GaugeFetcher};
use crate::model::{DiscussionRecord, FetchStatus, RegionReport, RegionSpec};

pub struct RegionAggregator<'a, C> {
    discussions: DiscussionFetcher<'a, C>,
    alerts: AlertFetcher<'a, C>,
    gauges: GaugeFetcher<'a, C>,
    strategy: FetchStrategy,
}

impl<'a, C: EndpointClient> RegionAggregator<'a, C> {
    pub fn new(client: &'a C, settings: &ServiceSettings, endpoints: &'a Endpoints) -> Self {
        let timeouts = &settings.timeouts;
        Self {
            discussions: DiscussionFetcher::new(client, &endpoints.nws_base, timeouts.discussion()),
            alerts: AlertFetcher::new(client, &endpoints.nws_base, timeouts.alert()),
            gauges: GaugeFetcher::new(
                client,
                &endpoints.nwps_base,
                timeouts.gauge(),
                settings.gauge_delay(),
            ),
            strategy: settings.strategy,
        }
    }

    /// Fetches everything for one region. Partial data is always a valid
    /// result; this never fails.
    pub async fn aggregate(&self, region: &RegionSpec) -> RegionReport {
        let code = region.region_code.as_str();

        let (discussions, alerts, gauges) = match self.strategy {
            FetchStrategy::Concurrent => {
                tokio::join!(
                    self.fetch_discussions(&region.offices),
                    self.alerts.fetch(code),
                    self.gauges.fetch(code),
                )
            }
            FetchStrategy::Sequential => {
                let discussions = self.fetch_discussions(&region.offices).await;
                let alerts = self.alerts.fetch(code).await;
                let gauges = self.gauges.fetch(code).await;
                (discussions, alerts, gauges)
            }
        };

        let ok = discussions.iter().filter(|d| d.fetch_status == FetchStatus::Ok).count();
        info!(
            region = %region.name,
            discussions = %format!("{}/{}", ok, discussions.len()),
            alerts = alerts.len(),
            gauges = gauges.len(),
            "region aggregated"
        );

        RegionReport {
            region: region.clone(),
            discussions,
            alerts,
            gauges,
        }
    }

    /// One record per office, in office order.
    async fn fetch_discussions(&self, offices: &[String]) -> Vec<DiscussionRecord> {
        match self.strategy {
            // join_all yields results in input order, not completion order.
            FetchStrategy::Concurrent => {
                join_all(offices.iter().map(|office| self.discussions.fetch(office))).await
            }
            FetchStrategy::Sequential => {
                let mut records = Vec::with_capacity(offices.len());
                for office in offices {
                    records.push(self.discussions.fetch(office).await);
                }
                records
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
