//! Public IP endpoint handler.

use axum::{extract::State, http::HeaderMap};
use tracing::{debug, instrument};

use crate::auth::is_authorized;
use crate::error::AppError;
use crate::state::AppState;

/// Handler for GET / (and any path other than /health).
///
/// Rejects requests whose `Authorization` header does not match the shared
/// secret before touching the cache, so unauthenticated traffic never reaches
/// the upstream service.
#[instrument(skip_all)]
pub async fn get_ip(State(state): State<AppState>, headers: HeaderMap) -> Result<String, AppError> {
    if !is_authorized(&headers, state.password()) {
        state.cache().metrics().record_auth_failure();
        debug!("rejected request with invalid password");
        return Err(AppError::Unauthorized);
    }

    let ip = state.cache().get_or_fetch().await?;
    Ok(ip)
}
