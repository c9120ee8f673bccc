//! Dialer Relay HTTP Handlers

use axum::extract::State;
use axum::Json;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use super::error::VicidialError;
use super::types::{
    AddLeadRequest, CallStatusAck, CallStatusReport, LeadResponse, LeadUpdate, NewLead,
    UpdateLeadRequest,
};
use crate::api::AppState;
use crate::crm;
use crate::extract::{validation_message, Payload};
use crate::phone::{is_blank, sanitize_for_dialer};

/// Add a lead to the dialer.
///
/// POST /api/vici/add-lead
#[instrument(skip(state, body))]
pub async fn add_lead(
    State(state): State<AppState>,
    Payload(body): Payload<AddLeadRequest>,
) -> Result<Json<LeadResponse>, VicidialError> {
    // Configuration problems take precedence over payload problems
    let client = state.vicidial_client()?;
    body.validate()
        .map_err(|e| VicidialError::Validation(validation_message(&e)))?;

    let lead = NewLead {
        phone_number: sanitize_for_dialer(body.phone_number.as_deref().unwrap_or_default())
            .to_string(),
        first_name: body.first_name.unwrap_or_default(),
        last_name: body.last_name.unwrap_or_default(),
    };

    let response = client.add_lead(&lead).await.map_err(|e| {
        error!(error = %e, "Error calling Vicidial API");
        VicidialError::Relay("Failed to submit phone number to Vicidial API")
    })?;

    info!(
        lead_id = response.reply.lead_id().unwrap_or("-"),
        "Lead submitted to Vicidial"
    );

    Ok(Json(LeadResponse {
        message: "Phone number submitted successfully",
        result: response.reply.summary(),
        response: response.raw,
    }))
}

/// Update an existing dialer lead.
///
/// POST /api/vici/update-lead
#[instrument(skip(state, body))]
pub async fn update_lead(
    State(state): State<AppState>,
    Payload(body): Payload<UpdateLeadRequest>,
) -> Result<Json<LeadResponse>, VicidialError> {
    let client = state.vicidial_client()?;
    body.validate()
        .map_err(|e| VicidialError::Validation(validation_message(&e)))?;

    let update = LeadUpdate {
        lead_id: body.lead_id.unwrap_or_default(),
        phone_number: sanitize_for_dialer(body.phone_number.as_deref().unwrap_or_default())
            .to_string(),
        first_name: body.first_name.unwrap_or_default(),
        last_name: body.last_name.unwrap_or_default(),
    };

    let response = client.update_lead(&update).await.map_err(|e| {
        error!(lead_id = %update.lead_id, error = %e, "Error updating Vicidial contact");
        VicidialError::Relay("Failed to update contact in Vicidial API")
    })?;

    info!(lead_id = %update.lead_id, "Lead update sent to Vicidial");

    // Report the lead id the caller asked to update
    let mut result = response.reply.summary();
    result.lead_id = Some(update.lead_id);

    Ok(Json(LeadResponse {
        message: "Contact updated successfully",
        result,
        response: response.raw,
    }))
}

/// Receive a call outcome from the dialer.
///
/// Always acknowledges; the optional CRM sync runs in the background.
///
/// POST /api/vicidial-call-status
#[instrument(skip(state, report))]
pub async fn call_status(
    State(state): State<AppState>,
    Payload(report): Payload<CallStatusReport>,
) -> Json<CallStatusAck> {
    info!(
        lead_id = ?report.lead_id,
        phone_number = ?report.phone_number,
        status = ?report.status,
        call_date = ?report.call_date,
        agent = ?report.agent,
        campaign_id = ?report.campaign_id,
        list_id = ?report.list_id,
        user_group = ?report.user_group,
        comments = ?report.comments,
        "Received call status from Vicidial"
    );

    if state.config.call_status_crm_sync {
        spawn_crm_sync(&state, report);
    }

    Json(CallStatusAck {
        message: "Call status received successfully",
    })
}

fn spawn_crm_sync(state: &AppState, report: CallStatusReport) {
    if is_blank(report.phone_number.as_deref()) {
        return;
    }

    match state.crm_client() {
        Ok(client) => {
            tokio::spawn(async move {
                crm::sync::record_call_status(&client, &report).await;
            });
        }
        Err(e) => warn!(error = %e, "Call status CRM sync skipped"),
    }
}
