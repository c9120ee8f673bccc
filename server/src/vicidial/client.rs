//! Non-Agent API Client
//!
//! Every call is a GET against `non_agent_api.php` with credentials and
//! arguments in the query string.

use reqwest::Url;
use tracing::{debug, info};

use super::error::VicidialError;
use super::response::ApiReply;
use super::types::{LeadUpdate, NewLead};
use crate::config::{VicidialConfig, VicidialCredentials};

/// Duplicate handling requested on `add_lead`: reject if the phone number
/// already exists in the same list.
const DUPLICATE_CHECK: &str = "DUPCHECK";

/// Body and parsed form of a dialer answer.
#[derive(Debug, Clone)]
pub struct DialerResponse {
    pub raw: String,
    pub reply: ApiReply,
}

/// Client for the dialer's non-agent API.
#[derive(Debug, Clone)]
pub struct VicidialClient {
    http: reqwest::Client,
    credentials: VicidialCredentials,
    list_id: String,
    source: String,
}

impl VicidialClient {
    /// Create a client from configured credentials.
    pub fn new(
        http: reqwest::Client,
        credentials: VicidialCredentials,
        list_id: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            http,
            credentials,
            list_id: list_id.into(),
            source: source.into(),
        }
    }

    /// Create a client from config, failing if credentials are incomplete.
    pub fn from_config(
        http: reqwest::Client,
        config: &VicidialConfig,
    ) -> Result<Self, VicidialError> {
        let credentials = config
            .credentials()
            .ok_or(VicidialError::MissingCredentials)?;
        Ok(Self::new(
            http,
            credentials,
            config.list_id.clone(),
            config.source.clone(),
        ))
    }

    /// URL for `function=add_lead`.
    pub fn add_lead_url(&self, lead: &NewLead) -> Result<Url, VicidialError> {
        let creds = &self.credentials;
        self.build_url(&[
            ("user", creds.username.as_str()),
            ("pass", creds.password.as_str()),
            ("function", "add_lead"),
            ("source", self.source.as_str()),
            ("phone_number", lead.phone_number.as_str()),
            ("list_id", self.list_id.as_str()),
            ("duplicate_check", DUPLICATE_CHECK),
            ("first_name", lead.first_name.as_str()),
            ("last_name", lead.last_name.as_str()),
        ])
    }

    /// URL for `function=update_lead`.
    pub fn update_lead_url(&self, update: &LeadUpdate) -> Result<Url, VicidialError> {
        let creds = &self.credentials;
        self.build_url(&[
            ("source", self.source.as_str()),
            ("user", creds.username.as_str()),
            ("pass", creds.password.as_str()),
            ("function", "update_lead"),
            ("lead_id", update.lead_id.as_str()),
            ("phone_number", update.phone_number.as_str()),
            ("first_name", update.first_name.as_str()),
            ("last_name", update.last_name.as_str()),
        ])
    }

    /// Add a new lead to the configured list.
    pub async fn add_lead(&self, lead: &NewLead) -> Result<DialerResponse, VicidialError> {
        let url = self.add_lead_url(lead)?;
        self.call(url).await
    }

    /// Update an existing lead by id.
    pub async fn update_lead(&self, update: &LeadUpdate) -> Result<DialerResponse, VicidialError> {
        let url = self.update_lead_url(update)?;
        self.call(url).await
    }

    fn build_url(&self, params: &[(&str, &str)]) -> Result<Url, VicidialError> {
        let mut url = Url::parse(&self.credentials.base_url)
            .map_err(|e| VicidialError::InvalidBaseUrl(e.to_string()))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn call(&self, url: Url) -> Result<DialerResponse, VicidialError> {
        debug!(url = %redacted_url(&url), "Calling Vicidial API");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VicidialError::Status(status.as_u16()));
        }

        let raw = response.text().await?;
        let reply = ApiReply::parse(&raw);
        info!(
            status = ?reply.status(),
            response = %raw.trim(),
            "Vicidial API response"
        );

        Ok(DialerResponse { raw, reply })
    }
}

/// Render a dialer URL with the password masked, for logs.
pub fn redacted_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "pass" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
