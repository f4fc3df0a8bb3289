//! Insight service adapters.
//!
//! [`HttpInsightService`] posts to the configured enrichment endpoint;
//! [`UnconfiguredInsightService`] stands in when no endpoint is set.

mod http_service;
mod unconfigured;

pub use http_service::HttpInsightService;
pub use unconfigured::UnconfiguredInsightService;
