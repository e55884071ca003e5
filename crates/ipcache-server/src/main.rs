//! IP Cache Server binary.

use anyhow::Context;
use clap::Parser;
use ipcache_server::{AppState, ServerConfig, metrics::init_metrics, run_server_with_state};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();

    tracing::info!(
        "Starting IP Cache Server v{}",
        ipcache_server::version()
    );
    tracing::info!(
        listen_addr = %config.listen_addr,
        upstream = %config.upstream_url,
        cache_duration_ms = config.cache_duration.as_millis() as u64,
        http_client_timeout_ms = config.http_client_timeout.as_millis() as u64,
        "configuration loaded"
    );

    let prometheus_handle = init_metrics().context("failed to install metrics recorder")?;

    let state = AppState::from_config(&config).context("failed to build upstream HTTP client")?;

    if let Err(e) = run_server_with_state(
        &config.listen_addr,
        state,
        Some(prometheus_handle),
        config.shutdown_timeout,
    )
    .await
    {
        tracing::error!(error = %e, "server terminated with error");
        return Err(e.into());
    }

    Ok(())
}
