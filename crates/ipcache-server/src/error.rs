use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// El header Authorization no coincide con el password
    #[error("invalid password")]
    Unauthorized,

    /// Fallo al obtener la IP del upstream
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // El detalle del upstream se loguea, nunca se envia al cliente.
        let body = match self {
            AppError::Unauthorized => "Invalid password",
            AppError::Upstream(_) => "Error while retrieving IP",
        };

        (status, body).into_response()
    }
}

/// Errors that stop the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// In-flight requests did not finish within the grace period.
    #[error("graceful shutdown did not complete within {}ms", .grace.as_millis())]
    ShutdownTimeout { grace: Duration },
}
