//! Unified error handling for the wallet API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ScanError;
use crate::settings::SettingsError;

/// Application-level error type for the wallet API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Voucher storage failed.
    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Settings could not be read, written or validated.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Scan request could not be processed.
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Settings(SettingsError::Incomplete | SettingsError::InvalidProvider(_))
            | Self::Scan(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Repository(_) | Self::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Wallet request error"
            );
        }

        // Don't expose internal error details to clients
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
