//! Dialer Relay Types
//!
//! Inbound webhook payloads, outbound lead parameters and caller responses.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::response::ReplySummary;
use crate::extract::lenient_string;

/// Body of `POST /api/vici/add-lead`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddLeadRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        required(message = "Phone number is required"),
        length(min = 1, message = "Phone number is required")
    )]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
}

/// Body of `POST /api/vici/update-lead`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        required(message = "leadId and phoneNumber are required"),
        length(min = 1, message = "leadId and phoneNumber are required")
    )]
    pub lead_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        required(message = "leadId and phoneNumber are required"),
        length(min = 1, message = "leadId and phoneNumber are required")
    )]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
}

/// Sanitized parameters for `function=add_lead`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
}

/// Sanitized parameters for `function=update_lead`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadUpdate {
    pub lead_id: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
}

/// Call outcome pushed by the dialer (dispatch URL / start-call URL).
///
/// Field names follow the dialer's own variable names.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CallStatusReport {
    #[serde(default, deserialize_with = "lenient_string")]
    pub lead_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub call_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub agent: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub campaign_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub list_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_group: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comments: Option<String>,
}

/// Response for the add/update lead routes.
#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub message: &'static str,
    /// Raw text returned by the dialer.
    pub response: String,
    pub result: ReplySummary,
}

/// Response for the call status webhook.
#[derive(Debug, Serialize)]
pub struct CallStatusAck {
    pub message: &'static str,
}
