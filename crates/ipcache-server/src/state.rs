//! Application state.

use std::sync::Arc;

use crate::cache::IpCache;
use crate::config::ServerConfig;
use crate::upstream::{IpSource, IpifyClient, UpstreamError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The IP cache (owns the upstream client).
    cache: Arc<IpCache>,
    /// Value the Authorization header must match.
    password: Arc<str>,
}

impl AppState {
    /// Creates a new AppState with the given cache and password.
    pub fn new(cache: Arc<IpCache>, password: impl Into<Arc<str>>) -> Self {
        Self {
            cache,
            password: password.into(),
        }
    }

    /// Creates an AppState over an arbitrary IP source.
    pub fn with_source(source: Arc<dyn IpSource>, config: &ServerConfig) -> Self {
        let cache = IpCache::new(source, config.cache_duration);
        Self::new(Arc::new(cache), config.password.as_str())
    }

    /// Creates an AppState backed by the ipify client described by `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self, UpstreamError> {
        let client = IpifyClient::with_url(&config.upstream_url, config.http_client_timeout)?;
        tracing::info!(upstream = client.url(), "upstream client ready");
        Ok(Self::with_source(Arc::new(client), config))
    }

    /// Returns the IP cache.
    pub fn cache(&self) -> &IpCache {
        self.cache.as_ref()
    }

    /// Returns the configured shared secret.
    pub fn password(&self) -> &str {
        &self.password
    }
}
