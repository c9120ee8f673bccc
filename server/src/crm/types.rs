//! CRM Relay Types

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::{lenient_list, lenient_string};
use crate::phone::sanitize_for_crm;

/// Body of `POST /api/crm/add-contact`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddContactRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Option<Vec<String>>,
}

/// Body of `POST /api/crm/update-contact`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        required(message = "contactId is required"),
        length(min = 1, message = "contactId is required")
    )]
    pub contact_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Option<Vec<String>>,
}

/// Query of `GET /api/crm/contacts/lookup`.
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Contact fields sent to the CRM. Absent fields are left untouched
/// upstream, so they are omitted rather than sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is invalid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ContactDraft {
    /// Build a draft from raw webhook fields, dropping blanks.
    pub fn from_fields(
        phone: Option<String>,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Self {
        Self {
            phone: non_blank(phone.as_deref().map(sanitize_for_crm)),
            email: non_blank(email.as_deref().map(str::trim)),
            first_name: non_blank(first_name.as_deref()),
            last_name: non_blank(last_name.as_deref()),
            tags: tags.filter(|t| !t.is_empty()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Contact lookup by phone and/or email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactLookup {
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactLookup {
    pub fn new(phone: Option<&str>, email: Option<&str>) -> Self {
        Self {
            phone: non_blank(phone.map(sanitize_for_crm)),
            email: non_blank(email.map(str::trim)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.email.is_none()
    }
}

/// Response for `POST /api/crm/add-contact`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreatedResponse {
    pub message: &'static str,
    pub contact_id: Option<String>,
    /// Contact object as returned by the CRM.
    pub response: serde_json::Value,
}

/// Response for `POST /api/crm/update-contact`.
#[derive(Debug, Serialize)]
pub struct ContactUpdatedResponse {
    pub message: &'static str,
    pub response: serde_json::Value,
}

/// Response for `GET /api/crm/contacts/lookup`.
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub contacts: Vec<serde_json::Value>,
}
