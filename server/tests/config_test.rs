//! Environment configuration tests
//!
//! These mutate process environment variables, so every test runs serially.
//!
//! Run with: `cargo test --test config_test`

use leadrelay_server::config::{Config, DEFAULT_CRM_BASE_URL, DEFAULT_LIST_ID, DEFAULT_SOURCE};
use serial_test::serial;
use std::env;

const KEYS: &[&str] = &[
    "BIND_ADDRESS",
    "VICIDIAL_API_USERNAME",
    "VICIDIAL_API_PASSWORD",
    "VICIDIAL_BASE_URL",
    "VICIDIAL_LIST_ID",
    "VICIDIAL_SOURCE",
    "GHL_API_KEY",
    "GHL_BASE_URL",
    "UPSTREAM_TIMEOUT_SECS",
    "CALL_STATUS_CRM_SYNC",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.bind_address, "0.0.0.0:3000");
    assert_eq!(config.vicidial.list_id, DEFAULT_LIST_ID);
    assert_eq!(config.vicidial.source, DEFAULT_SOURCE);
    assert!(!config.vicidial.is_configured());
    assert_eq!(config.crm.base_url, DEFAULT_CRM_BASE_URL);
    assert!(!config.crm.is_configured());
    assert_eq!(config.upstream_timeout_secs, 30);
    assert!(!config.call_status_crm_sync);
}

#[test]
#[serial]
fn test_overrides_from_env() {
    clear_env();
    env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
    env::set_var("VICIDIAL_API_USERNAME", "apiuser");
    env::set_var("VICIDIAL_API_PASSWORD", "s3cret");
    env::set_var("VICIDIAL_BASE_URL", "https://dialer.example.com/vicidial/non_agent_api.php");
    env::set_var("VICIDIAL_LIST_ID", "998");
    env::set_var("VICIDIAL_SOURCE", "webform");
    env::set_var("GHL_API_KEY", "ghl-key");
    env::set_var("GHL_BASE_URL", "https://crm.example.com/v1/");
    env::set_var("UPSTREAM_TIMEOUT_SECS", "12");
    env::set_var("CALL_STATUS_CRM_SYNC", "true");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.bind_address, "127.0.0.1:8080");
    let creds = config.vicidial.credentials().expect("dialer should be configured");
    assert_eq!(creds.username, "apiuser");
    assert_eq!(creds.password, "s3cret");
    assert_eq!(
        creds.base_url,
        "https://dialer.example.com/vicidial/non_agent_api.php"
    );
    assert_eq!(config.vicidial.list_id, "998");
    assert_eq!(config.vicidial.source, "webform");
    assert_eq!(config.crm.api_key(), Some("ghl-key"));
    assert_eq!(config.crm.base_url, "https://crm.example.com/v1");
    assert_eq!(config.upstream_timeout_secs, 12);
    assert!(config.call_status_crm_sync);
}

#[test]
#[serial]
fn test_blank_values_are_unset() {
    clear_env();
    env::set_var("VICIDIAL_API_USERNAME", "  ");
    env::set_var("VICIDIAL_LIST_ID", "");
    env::set_var("GHL_API_KEY", " ");
    env::set_var("UPSTREAM_TIMEOUT_SECS", "");

    let config = Config::from_env().unwrap();
    clear_env();

    assert!(config.vicidial.username.is_none());
    assert_eq!(config.vicidial.list_id, DEFAULT_LIST_ID);
    assert!(config.crm.api_key.is_none());
    assert_eq!(config.upstream_timeout_secs, 30);
}

#[test]
#[serial]
fn test_invalid_timeout_is_an_error() {
    clear_env();
    env::set_var("UPSTREAM_TIMEOUT_SECS", "soon");

    let err = Config::from_env().unwrap_err();
    clear_env();

    assert!(err.to_string().contains("UPSTREAM_TIMEOUT_SECS"));
}

#[test]
#[serial]
fn test_invalid_sync_flag_is_an_error() {
    clear_env();
    env::set_var("CALL_STATUS_CRM_SYNC", "sometimes");

    let err = Config::from_env().unwrap_err();
    clear_env();

    assert!(err.to_string().contains("CALL_STATUS_CRM_SYNC"));
}
