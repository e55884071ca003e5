//! Cache metrics recording.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("ipcache_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("ipcache_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "ipcache_upstream_failures_total",
        "Total number of failed upstream lookups"
    );
    metrics::describe_counter!(
        "ipcache_auth_failures_total",
        "Total number of requests rejected for a wrong password"
    );
    metrics::describe_histogram!(
        "ipcache_upstream_fetch_seconds",
        "Time spent fetching the IP from upstream"
    );
}

/// Recorder de metricas del cache de IP.
/// Usa atomic counters internos para que los tests puedan leerlos.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    upstream_failures: Arc<AtomicU64>,
    auth_failures: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("ipcache_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("ipcache_cache_misses_total").increment(1);
    }

    /// Registra un fallo del upstream
    pub fn record_upstream_failure(&self, kind: &'static str) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
        counter!("ipcache_upstream_failures_total", "kind" => kind).increment(1);
    }

    /// Registra un request rechazado por password invalido
    pub fn record_auth_failure(&self) {
        self.auth_failures.fetch_add(1, Ordering::Relaxed);
        counter!("ipcache_auth_failures_total").increment(1);
    }

    /// Registra la duracion de una llamada al upstream
    pub fn record_fetch_duration(&self, outcome: &'static str, duration: Duration) {
        histogram!("ipcache_upstream_fetch_seconds", "outcome" => outcome)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn upstream_failures(&self) -> u64 {
        self.upstream_failures.load(Ordering::Relaxed)
    }

    pub fn auth_failures(&self) -> u64 {
        self.auth_failures.load(Ordering::Relaxed)
    }
}
