//! CRM Relay Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::ErrorResponse;

/// CRM relay error types.
#[derive(Debug, Error)]
pub enum CrmError {
    /// `GHL_API_KEY` not configured.
    #[error("CRM API credentials are not set")]
    MissingCredentials,

    /// Inbound payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// Contact id unknown to the CRM.
    #[error("Contact not found in CRM")]
    NotFound,

    /// `GHL_BASE_URL` is not a valid base URL.
    #[error("Invalid CRM base URL: {0}")]
    InvalidBaseUrl(String),

    /// Transport or decoding failure talking to the CRM.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// CRM answered with a non-2xx status.
    #[error("CRM API returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Relay failed; the message is returned to the caller as-is.
    #[error("{0}")]
    Relay(&'static str),
}

impl CrmError {
    /// Upstream status code, if the CRM answered at all.
    pub const fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl IntoResponse for CrmError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MissingCredentials | Self::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBaseUrl(_) | Self::Request(_) | Self::Upstream { .. } => {
                tracing::error!(error = %self, "Unhandled CRM client error");
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
