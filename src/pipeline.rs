/// Whole-run orchestration: every configured region into one `WeatherDocument`.
///
/// A run has exactly two outcomes. Configuration problems abort it before a
/// single request goes out (`Err(ConfigError)`); anything that goes wrong
/// after that only degrades the data, and the run completes with a document.

use chrono::Utc;
use futures::future::join_all;
use indexmap::IndexMap;
use std::path::Path;
use tracing::info;

use crate::aggregate::RegionAggregator;
use crate::client::EndpointClient;
use crate::config::{Endpoints, FetchStrategy, ServiceConfig, ServiceSettings, load_config};
use crate::ingest::OutlookFetcher;
use crate::model::{ConfigError, RegionReport, RegionSpec, TropicalOutlook, WeatherDocument};

pub struct PipelineDriver<'a, C> {
    client: &'a C,
    settings: ServiceSettings,
    endpoints: Endpoints,
}

impl<'a, C: EndpointClient> PipelineDriver<'a, C> {
    pub fn new(client: &'a C, settings: ServiceSettings, endpoints: Endpoints) -> Self {
        Self { client, settings, endpoints }
    }

    pub fn from_config(client: &'a C, config: &ServiceConfig) -> Self {
        Self::new(client, config.service.clone(), config.endpoints.clone())
    }

    /// Overrides the configured strategy (the `--sequential` flag).
    pub fn with_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.settings.strategy = strategy;
        self
    }

    /// Skips the NHC tropical outlook fetch.
    pub fn without_tropical_outlook(mut self) -> Self {
        self.settings.tropical_outlook = false;
        self
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Fetches every region. Always completes; failed sources show up as
    /// error discussions, empty lists or an outlook with `error` set.
    pub async fn run(&self, regions: &[RegionSpec]) -> WeatherDocument {
        let aggregator = RegionAggregator::new(self.client, &self.settings, &self.endpoints);

        info!(
            regions = regions.len(),
            strategy = ?self.settings.strategy,
            "starting fetch run"
        );

        let (reports, tropical) = match self.settings.strategy {
            FetchStrategy::Concurrent => {
                tokio::join!(
                    join_all(regions.iter().map(|region| aggregator.aggregate(region))),
                    self.fetch_outlook(),
                )
            }
            FetchStrategy::Sequential => {
                let mut reports = Vec::with_capacity(regions.len());
                for region in regions {
                    reports.push(aggregator.aggregate(region).await);
                }
                (reports, self.fetch_outlook().await)
            }
        };

        let document = WeatherDocument {
            generated_at: Utc::now(),
            tropical,
            regions: index_by_name(reports),
        };

        info!(
            regions = document.regions.len(),
            alerts = document.all_alerts().count(),
            "fetch run complete"
        );
        document
    }

    async fn fetch_outlook(&self) -> Option<TropicalOutlook> {
        if !self.settings.tropical_outlook {
            return None;
        }
        let fetcher = OutlookFetcher::new(
            self.client,
            &self.endpoints.nhc_outlook_url,
            self.settings.timeouts.outlook(),
        );
        Some(fetcher.fetch().await)
    }
}

fn index_by_name(reports: Vec<RegionReport>) -> IndexMap<String, RegionReport> {
    reports
        .into_iter()
        .map(|report| (report.region.name.clone(), report))
        .collect()
}

/// Loads the registry at `path` and runs it against `client`.
///
/// # Errors
/// Any `ConfigError` from loading or validation. Nothing is fetched in that
/// case.
pub async fn run_configured<C: EndpointClient, P: AsRef<Path>>(
    client: &C,
    path: P,
) -> Result<WeatherDocument, ConfigError> {
    let config = load_config(path)?;
    Ok(PipelineDriver::from_config(client, &config).run(&config.regions).await)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
