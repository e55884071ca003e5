//! Metrics module for the IP cache server.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::CacheMetrics;
pub use setup::init_metrics;
