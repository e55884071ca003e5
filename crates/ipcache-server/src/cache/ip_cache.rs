//! Read-through cache for the public IP address.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::metrics::CacheMetrics;
use crate::upstream::{IpSource, UpstreamError};

/// Cap applied to the freshness window so the expiry instant cannot overflow.
const MAX_CACHE_DURATION: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// The cached upstream response and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn empty() -> Self {
        Self {
            value: String::new(),
            expires_at: Instant::now(),
        }
    }

    /// Returns the cached text (empty when nothing has been fetched yet).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the instant at which the entry expires.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Una entry vacia equivale a "sin cache" sin importar la expiracion.
    pub fn is_fresh(&self, now: Instant) -> bool {
        !self.value.is_empty() && now < self.expires_at
    }
}

/// Cache de la IP publica con un unico slot.
///
/// The lock is held for the whole check-or-refresh, including the upstream
/// call. Requests arriving during a refresh wait for it and then observe the
/// freshly stored value; a cache hit never overtakes an in-flight refresh.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use ipcache_server::cache::IpCache;
/// use ipcache_server::upstream::IpifyClient;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = IpifyClient::new(Duration::from_secs(10))?;
/// let cache = IpCache::new(Arc::new(client), Duration::from_secs(20 * 60));
///
/// let ip = cache.get_or_fetch().await?;
/// println!("public IP: {ip}");
/// # Ok(())
/// # }
/// ```
pub struct IpCache {
    entry: Mutex<CacheEntry>,
    source: Arc<dyn IpSource>,
    cache_duration: Duration,
    metrics: CacheMetrics,
}

impl IpCache {
    /// Crea un cache vacio sobre la fuente dada.
    pub fn new(source: Arc<dyn IpSource>, cache_duration: Duration) -> Self {
        Self::with_metrics(source, cache_duration, CacheMetrics::new())
    }

    /// Crea un cache que registra en las metricas proporcionadas.
    pub fn with_metrics(
        source: Arc<dyn IpSource>,
        cache_duration: Duration,
        metrics: CacheMetrics,
    ) -> Self {
        Self {
            entry: Mutex::new(CacheEntry::empty()),
            source,
            cache_duration: cache_duration.min(MAX_CACHE_DURATION),
            metrics,
        }
    }

    /// Returns the cached IP if still fresh, otherwise fetches it from the
    /// source, stores it with a new expiry and returns it.
    ///
    /// On failure the entry is left untouched and the error is returned; there
    /// is no retry and no fallback to an expired value.
    pub async fn get_or_fetch(&self) -> Result<String, UpstreamError> {
        let mut entry = self.entry.lock().await;

        if entry.is_fresh(Instant::now()) {
            self.metrics.record_hit();
            debug!("serving cached IP");
            return Ok(entry.value.clone());
        }

        self.metrics.record_miss();
        debug!(source = self.source.name(), "cache stale, fetching IP");

        let start = Instant::now();
        match self.source.fetch().await {
            Ok(body) => {
                self.metrics.record_fetch_duration("ok", start.elapsed());
                entry.value.clone_from(&body);
                entry.expires_at = Instant::now() + self.cache_duration;
                Ok(body)
            },
            Err(e) => {
                self.metrics.record_fetch_duration("error", start.elapsed());
                match &e {
                    UpstreamError::Transport(reason) => {
                        self.metrics.record_upstream_failure("transport");
                        error!(error = %reason, "failed to retrieve IP");
                    },
                    UpstreamError::Body(reason) => {
                        self.metrics.record_upstream_failure("body");
                        error!(error = %reason, "failed to read response body");
                    },
                }
                Err(e)
            },
        }
    }

    /// Returns a copy of the current entry.
    pub async fn snapshot(&self) -> CacheEntry {
        self.entry.lock().await.clone()
    }

    /// Returns the configured freshness window.
    pub fn cache_duration(&self) -> Duration {
        self.cache_duration
    }

    /// Retorna las metricas para acceso externo.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}
