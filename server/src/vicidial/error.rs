//! Dialer Relay Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::ErrorResponse;

/// Dialer relay error types.
#[derive(Debug, Error)]
pub enum VicidialError {
    /// Username, password or base URL not configured.
    #[error("Vicidial API credentials are not set")]
    MissingCredentials,

    /// Inbound payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// `VICIDIAL_BASE_URL` is not a valid URL.
    #[error("Invalid Vicidial base URL: {0}")]
    InvalidBaseUrl(String),

    /// Transport failure talking to the dialer.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Dialer answered with a non-2xx status.
    #[error("Vicidial API returned HTTP {0}")]
    Status(u16),

    /// Relay failed; the message is returned to the caller as-is.
    #[error("{0}")]
    Relay(&'static str),
}

impl IntoResponse for VicidialError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::MissingCredentials | Self::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBaseUrl(_) | Self::Request(_) | Self::Status(_) => {
                tracing::error!(error = %self, "Unhandled Vicidial client error");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response();
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
