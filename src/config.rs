/// Region registry and service settings loader - parses regions.toml
///
/// Keeps the list of monitored regions, their forecast offices, request
/// timeouts and upstream base URLs out of the code, so offices can be added
/// or timeouts tuned without recompiling the service.
///
/// Unlike the rest of the pipeline, problems here are fatal: a run without a
/// valid region list is aborted before any request is made.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::model::{ConfigError, RegionSpec};

pub const DEFAULT_CONFIG_PATH: &str = "regions.toml";

/// Identification sent with every request; api.weather.gov rejects
/// requests without one.
pub const DEFAULT_USER_AGENT: &str = "EmergencyManagementWeatherBot/1.0 (dev.em.weather@example.com)";

pub const NWS_API_BASE: &str = "https://api.weather.gov";
pub const NWPS_API_BASE: &str = "https://api.water.noaa.gov/nwps/v1";
pub const NHC_OUTLOOK_URL: &str = "https://www.nhc.noaa.gov/gtwo.php?basin=atlc&fdays=7";

/// Environment variable that overrides `service.user_agent`.
pub const USER_AGENT_ENV: &str = "WXBRIEF_USER_AGENT";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// How the aggregator and driver schedule their sub-fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Every request awaited before the next one is issued.
    Sequential,
    /// Requests issued together and joined.
    #[default]
    Concurrent,
}

/// Per-endpoint request timeouts, in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub discussion_secs: u64,
    pub alert_secs: u64,
    pub gauge_secs: u64,
    pub outlook_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            discussion_secs: 15,
            alert_secs: 15,
            gauge_secs: 45,
            outlook_secs: 15,
        }
    }
}

impl Timeouts {
    pub fn discussion(&self) -> Duration {
        Duration::from_secs(self.discussion_secs)
    }

    pub fn alert(&self) -> Duration {
        Duration::from_secs(self.alert_secs)
    }

    pub fn gauge(&self) -> Duration {
        Duration::from_secs(self.gauge_secs)
    }

    pub fn outlook(&self) -> Duration {
        Duration::from_secs(self.outlook_secs)
    }
}

/// Upstream base URLs. Overridable so a run can be pointed at a mirror.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub nws_base: String,
    pub nwps_base: String,
    pub nhc_outlook_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nws_base: NWS_API_BASE.to_string(),
            nwps_base: NWPS_API_BASE.to_string(),
            nhc_outlook_url: NHC_OUTLOOK_URL.to_string(),
        }
    }
}

/// `[service]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub user_agent: String,
    pub strategy: FetchStrategy,
    /// Pause after each region's gauge request.
    pub gauge_delay_ms: u64,
    pub tropical_outlook: bool,
    pub timeouts: Timeouts,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            strategy: FetchStrategy::default(),
            gauge_delay_ms: 1000,
            tropical_outlook: true,
            timeouts: Timeouts::default(),
        }
    }
}

impl ServiceSettings {
    pub fn gauge_delay(&self) -> Duration {
        Duration::from_millis(self.gauge_delay_ms)
    }
}

/// Fully loaded configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub service: ServiceSettings,
    pub endpoints: Endpoints,
    pub regions: Vec<RegionSpec>,
}

impl ServiceConfig {
    /// Looks up a configured region by name.
    pub fn region(&self, name: &str) -> Option<&RegionSpec> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Total number of forecast offices across all regions.
    pub fn office_count(&self) -> usize {
        self.regions.iter().map(|r| r.offices.len()).sum()
    }
}

/// Root structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RegionRegistry {
    #[serde(default)]
    service: ServiceSettings,
    #[serde(default)]
    endpoints: Endpoints,
    #[serde(default)]
    region: Vec<RegionSpec>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads and validates the region registry from a TOML file, then applies
/// environment overrides.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, ConfigError> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let registry: RegionRegistry = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = ServiceConfig {
        service: registry.service,
        endpoints: registry.endpoints,
        regions: registry.region,
    };

    if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
        config.service.user_agent = agent;
    }

    validate(&config)?;
    Ok(config)
}

/// Checks the invariants the pipeline relies on.
pub fn validate(config: &ServiceConfig) -> Result<(), ConfigError> {
    if config.service.user_agent.trim().is_empty() {
        return Err(ConfigError::EmptyUserAgent);
    }

    if config.regions.is_empty() {
        return Err(ConfigError::NoRegions);
    }

    let mut seen = HashSet::new();
    for region in &config.regions {
        let code = &region.region_code;
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidRegionCode {
                region: region.name.clone(),
                code: code.clone(),
            });
        }

        if region.offices.is_empty() || region.offices.iter().any(|o| o.trim().is_empty()) {
            return Err(ConfigError::NoOffices { region: region.name.clone() });
        }

        if !seen.insert(region.name.as_str()) {
            return Err(ConfigError::DuplicateRegion(region.name.clone()));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
