//! IP Cache Server - HTTP endpoint returning the host's public IP address.
//!
//! The address is looked up from an external service, cached for a fixed
//! window and served only to callers presenting the shared secret in the
//! `Authorization` header.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod state;
pub mod upstream;

pub use cache::{CacheEntry, IpCache};
pub use config::ServerConfig;
pub use error::{AppError, ServerError};
pub use server::{create_router, create_router_with_metrics, run_server_with_state, serve};
pub use state::AppState;
pub use upstream::{IpSource, IpifyClient, UpstreamError};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
