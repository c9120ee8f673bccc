//! Dialer Relay
//!
//! Webhook endpoints that forward leads to the VICIdial non-agent API and
//! receive call outcomes back from the dialer.

pub mod client;
pub mod error;
mod handlers;
pub mod response;
pub mod types;

use axum::{routing::post, Router};

use crate::api::AppState;

pub use client::VicidialClient;
pub use error::VicidialError;
pub use response::{ApiLine, ApiReply, ApiStatus};

/// Create the dialer router.
///
/// - POST /vici/add-lead - Add a lead to the configured list
/// - POST /vici/update-lead - Update an existing lead
/// - POST /vicidial-call-status - Call outcome webhook from the dialer
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vici/add-lead", post(handlers::add_lead))
        .route("/vici/update-lead", post(handlers::update_lead))
        .route("/vicidial-call-status", post(handlers::call_status))
}
