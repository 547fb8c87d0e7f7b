//! wxbrief_service: daily weather hazard briefing for emergency management.
//!
//! # Module structure
//!
//! ```text
//! wxbrief_service
//! ├── model       - shared data types (RegionSpec, RegionReport, WeatherDocument, FetchError, …)
//! ├── config      - region registry and service settings loader (regions.toml)
//! ├── client      - EndpointClient trait + reqwest-backed HttpClient
//! ├── replay      - canned-response client for tests and offline runs
//! ├── logging     - tracing setup and fetch failure classification
//! ├── ingest
//! │   ├── nws     - api.weather.gov: forecast discussions and active alerts
//! │   ├── nwps    - NWPS gauges forecast above flood stage
//! │   ├── nhc     - NHC Atlantic tropical weather outlook (HTML)
//! │   └── fixtures (test only) - representative API response payloads
//! ├── aggregate   - per-region fan-out (RegionAggregator)
//! ├── pipeline    - whole-run orchestration (PipelineDriver)
//! ├── report
//! │   ├── prompt  - per-region summarizer prompts
//! │   └── html    - briefing page rendering
//! ├── summarize   - LLM summaries (OpenAI chat completions)
//! └── output      - weather_data.json, prompts_for_llm.json, index.html
//! ```

pub mod aggregate;
pub mod client;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod replay;
pub mod report;
pub mod summarize;
