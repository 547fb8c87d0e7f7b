//! Upstream data sources. Each API gets its own file; every fetcher turns
//! upstream failures into degraded records instead of errors.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod nhc;
pub mod nwps;
pub mod nws;

pub use nhc::OutlookFetcher;
pub use nwps::GaugeFetcher;
pub use nws::{AlertFetcher, DiscussionFetcher};
