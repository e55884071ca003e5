use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::{error, info};

use crate::error::ServerError;
use crate::handlers::{health::health_check, ip::get_ip, metrics::metrics_handler};
use crate::middleware::{LoggingLayer, REQUEST_ID_HEADER};
use crate::state::AppState;

/// Creates the application router without a metrics endpoint.
pub fn create_router(state: AppState) -> Router {
    create_router_with_metrics(state, None)
}

/// Creates the application router. `/metrics` is mounted only when a
/// Prometheus handle is given.
pub fn create_router_with_metrics(
    state: AppState,
    prometheus_handle: Option<PrometheusHandle>,
) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            REQUEST_ID_HEADER.clone(),
            MakeRequestUuid,
        ))
        .layer(LoggingLayer)
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER.clone()));

    // Cualquier ruta distinta de /health devuelve la IP
    let app_router = Router::new()
        .route("/health", get(health_check))
        .route("/", get(get_ip))
        .route("/{*path}", get(get_ip))
        .with_state(state);

    let mut router = Router::new().merge(app_router);

    if let Some(handle) = prometheus_handle {
        let metrics_router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(handle);
        router = router.merge(metrics_router);
    }

    router
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Serves `router` on `listener` until `signal` resolves, then gives in-flight
/// requests `grace` to finish.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    signal: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        signal.await;
        let _ = shutdown_tx.send(());
    });
    let mut server = std::pin::pin!(server.into_future());

    tokio::select! {
        result = &mut server => return result.map_err(ServerError::from),
        _ = shutdown_rx => {},
    }

    info!("shutting down server");

    match tokio::time::timeout(grace, server).await {
        Ok(result) => {
            result?;
            info!("server stopped");
            Ok(())
        },
        Err(_) => {
            error!(grace_ms = grace.as_millis() as u64, "failed to shutdown server");
            Err(ServerError::ShutdownTimeout { grace })
        },
    }
}

/// Binds `addr` and serves the application until an interrupt or terminate
/// signal arrives.
pub async fn run_server_with_state(
    addr: &str,
    state: AppState,
    prometheus_handle: Option<PrometheusHandle>,
    grace: Duration,
) -> Result<(), ServerError> {
    let cache_metrics = state.cache().metrics().clone();
    let app = create_router_with_metrics(state, prometheus_handle);

    let listener = TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "listening on");

    let result = serve(listener, app, shutdown_signal(), grace).await;

    info!(
        hits = cache_metrics.hits(),
        misses = cache_metrics.misses(),
        upstream_failures = cache_metrics.upstream_failures(),
        auth_failures = cache_metrics.auth_failures(),
        hit_rate = cache_metrics.hit_rate(),
        "cache statistics"
    );

    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
