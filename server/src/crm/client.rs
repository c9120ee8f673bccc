//! GoHighLevel REST Client
//!
//! Contacts API (v1): bearer-token auth, JSON bodies, results wrapped in a
//! `contact` / `contacts` envelope.

use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::CrmError;
use super::types::{ContactDraft, ContactLookup};
use crate::config::CrmConfig;

/// Client for the CRM contacts API.
#[derive(Debug, Clone)]
pub struct CrmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct NoteBody<'a> {
    body: &'a str,
}

impl CrmClient {
    /// Create a client for the given base URL and API key.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client from config, failing if no API key is set.
    pub fn from_config(http: reqwest::Client, config: &CrmConfig) -> Result<Self, CrmError> {
        let api_key = config.api_key().ok_or(CrmError::MissingCredentials)?;
        Ok(Self::new(http, config.base_url.clone(), api_key))
    }

    /// Create a contact and return the stored contact object.
    ///
    /// POST {base}/contacts/
    pub async fn create_contact(&self, draft: &ContactDraft) -> Result<Value, CrmError> {
        let url = self.endpoint(&["contacts", ""])?;
        let body = self.send(self.http.post(url).json(draft)).await?;
        Ok(unwrap_envelope(body, "contact"))
    }

    /// Update the present fields of a contact.
    ///
    /// PUT {base}/contacts/{id}
    pub async fn update_contact(&self, contact_id: &str, draft: &ContactDraft) -> Result<Value, CrmError> {
        let url = self.endpoint(&["contacts", contact_id])?;
        let body = self.send(self.http.put(url).json(draft)).await?;
        Ok(unwrap_envelope(body, "contact"))
    }

    /// Find contacts by phone and/or email. No match is an empty list.
    ///
    /// GET {base}/contacts/lookup
    pub async fn lookup_contacts(&self, lookup: &ContactLookup) -> Result<Vec<Value>, CrmError> {
        let mut url = self.endpoint(&["contacts", "lookup"])?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(phone) = &lookup.phone {
                query.append_pair("phone", phone);
            }
            if let Some(email) = &lookup.email {
                query.append_pair("email", email);
            }
        }

        let body = match self.send(self.http.get(url)).await {
            Ok(body) => body,
            Err(CrmError::Upstream { status, .. })
                if status == StatusCode::NOT_FOUND.as_u16()
                    || status == StatusCode::UNPROCESSABLE_ENTITY.as_u16() =>
            {
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(match unwrap_envelope(body, "contacts") {
            Value::Array(contacts) => contacts,
            _ => Vec::new(),
        })
    }

    /// Attach a note to a contact.
    ///
    /// POST {base}/contacts/{id}/notes/
    pub async fn add_note(&self, contact_id: &str, body: &str) -> Result<Value, CrmError> {
        let url = self.endpoint(&["contacts", contact_id, "notes", ""])?;
        self.send(self.http.post(url).json(&NoteBody { body })).await
    }

    /// Base URL with path segments appended; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CrmError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| CrmError::InvalidBaseUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| CrmError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, CrmError> {
        let response = request
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "CRM API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CrmError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| CrmError::Upstream {
            status: status.as_u16(),
            body: format!("invalid JSON: {e}"),
        })
    }
}

/// Pull `key` out of a `{ key: ... }` envelope, or return the body as-is.
fn unwrap_envelope(mut body: Value, key: &str) -> Value {
    match body.get_mut(key) {
        Some(inner) => inner.take(),
        None => body,
    }
}

/// The `id` of a contact object, if present.
pub fn contact_id(contact: &Value) -> Option<String> {
    match contact.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
