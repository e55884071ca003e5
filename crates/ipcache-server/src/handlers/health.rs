use axum::http::StatusCode;

/// Liveness probe: always 200 with an empty body, no authentication.
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
