//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;

/// Default VICIdial list new leads are added to.
pub const DEFAULT_LIST_ID: &str = "1234";

/// Default `source` parameter sent with every dialer call.
pub const DEFAULT_SOURCE: &str = "GoHighLevel";

/// Default GoHighLevel REST base URL.
pub const DEFAULT_CRM_BASE_URL: &str = "https://rest.gohighlevel.com/v1";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3000")
    pub bind_address: String,

    /// VICIdial non-agent API settings
    pub vicidial: VicidialConfig,

    /// GoHighLevel REST API settings
    pub crm: CrmConfig,

    /// Outbound request timeout in seconds (default: 30)
    pub upstream_timeout_secs: u64,

    /// Push dialer call outcomes into the CRM as contact notes
    pub call_status_crm_sync: bool,
}

/// VICIdial non-agent API settings.
#[derive(Debug, Clone)]
pub struct VicidialConfig {
    /// API user
    pub username: Option<String>,
    /// API password
    pub password: Option<String>,
    /// Full URL of `non_agent_api.php`
    pub base_url: Option<String>,
    /// List new leads are added to
    pub list_id: String,
    /// Value of the `source` parameter
    pub source: String,
}

/// Complete dialer credentials, only available when every part is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VicidialCredentials {
    pub username: String,
    pub password: String,
    pub base_url: String,
}

/// GoHighLevel REST API settings.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    /// Location or agency API key, sent as a bearer token
    pub api_key: Option<String>,
    /// REST base URL without trailing slash
    pub base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            vicidial: VicidialConfig {
                username: non_empty_var("VICIDIAL_API_USERNAME"),
                password: non_empty_var("VICIDIAL_API_PASSWORD"),
                base_url: non_empty_var("VICIDIAL_BASE_URL"),
                list_id: non_empty_var("VICIDIAL_LIST_ID")
                    .unwrap_or_else(|| DEFAULT_LIST_ID.into()),
                source: non_empty_var("VICIDIAL_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.into()),
            },
            crm: CrmConfig {
                api_key: non_empty_var("GHL_API_KEY"),
                base_url: non_empty_var("GHL_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_CRM_BASE_URL.into()),
            },
            upstream_timeout_secs: match non_empty_var("UPSTREAM_TIMEOUT_SECS") {
                Some(v) => v
                    .parse()
                    .with_context(|| format!("UPSTREAM_TIMEOUT_SECS must be a number, got {v:?}"))?,
                None => 30,
            },
            call_status_crm_sync: match non_empty_var("CALL_STATUS_CRM_SYNC") {
                Some(v) => parse_flag(&v)
                    .with_context(|| format!("CALL_STATUS_CRM_SYNC must be a boolean, got {v:?}"))?,
                None => false,
            },
        })
    }

    /// Create a default configuration for testing.
    ///
    /// Upstream URLs point at a closed local port; tests that talk to a fake
    /// dialer or CRM override them with the fake server's address.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".into(),
            vicidial: VicidialConfig {
                username: Some("apiuser".into()),
                password: Some("apipass".into()),
                base_url: Some("http://127.0.0.1:9/vicidial/non_agent_api.php".into()),
                list_id: DEFAULT_LIST_ID.into(),
                source: DEFAULT_SOURCE.into(),
            },
            crm: CrmConfig {
                api_key: Some("test-api-key".into()),
                base_url: "http://127.0.0.1:9/v1".into(),
            },
            upstream_timeout_secs: 5,
            call_status_crm_sync: false,
        }
    }
}

impl VicidialConfig {
    /// Credentials for the dialer API, if fully configured.
    #[must_use]
    pub fn credentials(&self) -> Option<VicidialCredentials> {
        match (&self.username, &self.password, &self.base_url) {
            (Some(username), Some(password), Some(base_url))
                if !username.is_empty() && !password.is_empty() && !base_url.is_empty() =>
            {
                Some(VicidialCredentials {
                    username: username.clone(),
                    password: password.clone(),
                    base_url: base_url.clone(),
                })
            }
            _ => None,
        }
    }

    /// Check if the dialer API is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

impl CrmConfig {
    /// Bearer token for the CRM API, if configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Check if the CRM API is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

/// Read an environment variable, treating blank values as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
