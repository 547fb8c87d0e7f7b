/// Integration tests for loading the region registry from disk.
///
/// Each test writes a regions.toml into a temp directory and checks that
/// `load_config` either yields the expected settings or the matching
/// `ConfigError` variant.
///
/// Run with: cargo test --test config_loading

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use wxbrief_service::config::{FetchStrategy, NWS_API_BASE, load_config};
use wxbrief_service::model::ConfigError;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn write_registry(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("regions.toml");
    fs::write(&path, contents).expect("Failed to write test registry");
    path
}

const VALID_REGISTRY: &str = r#"
[service]
user_agent = "TestBot/0.1 (ops@example.com)"
strategy = "sequential"
gauge_delay_ms = 250
tropical_outlook = false

[service.timeouts]
discussion_secs = 5
gauge_secs = 30

[endpoints]
nwps_base = "http://localhost:9000/nwps/v1"

[[region]]
name = "Tennessee"
region_code = "TN"
offices = ["OHX", "MEG", "MRX"]

[[region]]
name = "U.S. Virgin Islands"
region_code = "VI"
offices = ["SJU"]
"#;

// ---------------------------------------------------------------------------
// Valid registries
// ---------------------------------------------------------------------------

#[test]
fn test_valid_registry_loads_all_sections() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(write_registry(&dir, VALID_REGISTRY)).expect("valid registry should load");

    assert_eq!(config.regions.len(), 2);
    assert_eq!(config.regions[0].name, "Tennessee");
    assert_eq!(config.regions[0].offices, vec!["OHX", "MEG", "MRX"]);
    assert_eq!(config.regions[1].region_code, "VI");
    assert_eq!(config.office_count(), 4);

    assert_eq!(config.service.strategy, FetchStrategy::Sequential);
    assert_eq!(config.service.gauge_delay(), Duration::from_millis(250));
    assert!(!config.service.tropical_outlook);
    assert_eq!(config.service.timeouts.discussion(), Duration::from_secs(5));
    assert_eq!(config.service.timeouts.gauge(), Duration::from_secs(30));
    assert_eq!(config.service.timeouts.alert(), Duration::from_secs(15), "unset timeout keeps its default");

    assert_eq!(config.endpoints.nwps_base, "http://localhost:9000/nwps/v1");
    assert_eq!(config.endpoints.nws_base, NWS_API_BASE, "unset endpoint keeps its default");
}

#[test]
fn test_region_lookup_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(write_registry(&dir, VALID_REGISTRY)).unwrap();

    assert!(config.region("U.S. Virgin Islands").is_some());
    assert!(config.region("Puerto Rico").is_none());
}

// ---------------------------------------------------------------------------
// Rejected registries
// ---------------------------------------------------------------------------

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Read { .. })), "got {:?}", result);
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(write_registry(&dir, "[[region]\nname = "));
    assert!(matches!(result, Err(ConfigError::Parse { .. })), "got {:?}", result);
}

#[test]
fn test_unknown_strategy_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(write_registry(
        &dir,
        r#"
        [service]
        strategy = "parallel"

        [[region]]
        name = "Test"
        region_code = "TS"
        offices = ["AAA"]
        "#,
    ));
    assert!(matches!(result, Err(ConfigError::Parse { .. })), "got {:?}", result);
}

#[test]
fn test_numeric_region_code_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(write_registry(
        &dir,
        r#"
        [[region]]
        name = "Test"
        region_code = "T1"
        offices = ["AAA"]
        "#,
    ));
    match result {
        Err(ConfigError::InvalidRegionCode { region, code }) => {
            assert_eq!(region, "Test");
            assert_eq!(code, "T1");
        }
        other => panic!("expected InvalidRegionCode, got {:?}", other),
    }
}

#[test]
fn test_blank_office_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(write_registry(
        &dir,
        r#"
        [[region]]
        name = "Test"
        region_code = "TS"
        offices = ["AAA", " "]
        "#,
    ));
    assert!(matches!(result, Err(ConfigError::NoOffices { .. })), "got {:?}", result);
}

#[test]
fn test_registry_without_regions_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_config(write_registry(&dir, "[service]\ngauge_delay_ms = 0\n"));
    assert!(matches!(result, Err(ConfigError::NoRegions)), "got {:?}", result);
}

#[test]
fn test_error_messages_name_the_problem() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(write_registry(
        &dir,
        r#"
        [[region]]
        name = "Florida"
        region_code = "FL"
        offices = ["MFL"]

        [[region]]
        name = "Florida"
        region_code = "FL"
        offices = ["TBW"]
        "#,
    ))
    .expect_err("duplicate region should be rejected");

    assert_eq!(err.to_string(), "region 'Florida' is configured more than once");
}
