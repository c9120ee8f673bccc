//! CRM Relay
//!
//! Contact management against the GoHighLevel REST API, plus the optional
//! push of dialer call outcomes into contact notes.

pub mod client;
pub mod error;
mod handlers;
pub mod sync;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use client::CrmClient;
pub use error::CrmError;

/// Create the CRM router.
///
/// - POST /crm/add-contact - Create a contact
/// - POST /crm/update-contact - Update a contact by id
/// - GET /crm/contacts/lookup - Find contacts by phone or email
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/crm/add-contact", post(handlers::add_contact))
        .route("/crm/update-contact", post(handlers::update_contact))
        .route("/crm/contacts/lookup", get(handlers::lookup_contacts))
}
