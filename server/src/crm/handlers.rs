//! CRM Relay HTTP Handlers

use axum::extract::State;
use axum::Json;
use tracing::{error, info, instrument};
use validator::Validate;

use super::client::contact_id;
use super::error::CrmError;
use super::types::{
    AddContactRequest, ContactCreatedResponse, ContactDraft, ContactLookup,
    ContactUpdatedResponse, LookupQuery, LookupResponse, UpdateContactRequest,
};
use crate::api::AppState;
use crate::extract::{validation_message, Payload, QueryParams};

/// Create a CRM contact.
///
/// POST /api/crm/add-contact
#[instrument(skip(state, body))]
pub async fn add_contact(
    State(state): State<AppState>,
    Payload(body): Payload<AddContactRequest>,
) -> Result<Json<ContactCreatedResponse>, CrmError> {
    let client = state.crm_client()?;

    let draft = ContactDraft::from_fields(
        body.phone_number,
        body.email,
        body.first_name,
        body.last_name,
        body.tags,
    );
    if draft.phone.is_none() && draft.email.is_none() {
        return Err(CrmError::Validation(
            "phoneNumber or email is required".to_string(),
        ));
    }
    draft
        .validate()
        .map_err(|e| CrmError::Validation(validation_message(&e)))?;

    let contact = client.create_contact(&draft).await.map_err(|e| {
        error!(upstream_status = ?e.upstream_status(), error = %e, "Error creating CRM contact");
        CrmError::Relay("Failed to create contact in CRM API")
    })?;

    let id = contact_id(&contact);
    info!(contact_id = ?id, "Contact created in CRM");

    Ok(Json(ContactCreatedResponse {
        message: "Contact created successfully",
        contact_id: id,
        response: contact,
    }))
}

/// Update fields of an existing CRM contact.
///
/// POST /api/crm/update-contact
#[instrument(skip(state, body))]
pub async fn update_contact(
    State(state): State<AppState>,
    Payload(body): Payload<UpdateContactRequest>,
) -> Result<Json<ContactUpdatedResponse>, CrmError> {
    let client = state.crm_client()?;
    body.validate()
        .map_err(|e| CrmError::Validation(validation_message(&e)))?;

    let contact_id = body.contact_id.unwrap_or_default();
    let draft = ContactDraft::from_fields(
        body.phone_number,
        body.email,
        body.first_name,
        body.last_name,
        body.tags,
    );
    draft
        .validate()
        .map_err(|e| CrmError::Validation(validation_message(&e)))?;

    let contact = client
        .update_contact(&contact_id, &draft)
        .await
        .map_err(|e| match e.upstream_status() {
            Some(404) => CrmError::NotFound,
            _ => {
                error!(contact_id = %contact_id, error = %e, "Error updating CRM contact");
                CrmError::Relay("Failed to update contact in CRM API")
            }
        })?;

    info!(contact_id = %contact_id, "Contact updated in CRM");

    Ok(Json(ContactUpdatedResponse {
        message: "Contact updated successfully",
        response: contact,
    }))
}

/// Look up CRM contacts by phone and/or email.
///
/// GET /api/crm/contacts/lookup
#[instrument(skip(state, query))]
pub async fn lookup_contacts(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LookupQuery>,
) -> Result<Json<LookupResponse>, CrmError> {
    let client = state.crm_client()?;

    let lookup = ContactLookup::new(query.phone.as_deref(), query.email.as_deref());
    if lookup.is_empty() {
        return Err(CrmError::Validation("phone or email is required".to_string()));
    }

    let contacts = client.lookup_contacts(&lookup).await.map_err(|e| {
        error!(upstream_status = ?e.upstream_status(), error = %e, "Error looking up CRM contact");
        CrmError::Relay("Failed to look up contact in CRM API")
    })?;

    Ok(Json(LookupResponse { contacts }))
}
