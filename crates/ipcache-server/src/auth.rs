//! Shared-secret authentication.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use subtle::ConstantTimeEq;

/// Returns true when the `Authorization` header equals `secret` byte for byte.
/// A missing header reads as empty. The comparison runs in constant time for
/// equal lengths.
pub fn is_authorized(headers: &HeaderMap, secret: &str) -> bool {
    headers
        .get(AUTHORIZATION)
        .map(HeaderValue::as_bytes)
        .unwrap_or_default()
        .ct_eq(secret.as_bytes())
        .into()
}
