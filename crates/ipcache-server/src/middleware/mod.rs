//! Middleware stack para el servidor HTTP.
//!
//! - `SetRequestIdLayer` / `PropagateRequestIdLayer` (tower-http): genera o
//!   propaga X-Request-Id
//! - `LoggingLayer`: logging estructurado de requests

mod logging;

use axum::http::HeaderName;

pub use logging::LoggingLayer;

/// Header name for request ID.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
