//! API Router and Application State
//!
//! Central routing configuration and shared state.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    crm::{self, CrmClient, CrmError},
    vicidial::{self, VicidialClient, VicidialError},
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Pooled HTTP client for both upstream APIs
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Dialer client built from the current configuration.
    pub fn vicidial_client(&self) -> Result<VicidialClient, VicidialError> {
        VicidialClient::from_config(self.http.clone(), &self.config.vicidial)
    }

    /// CRM client built from the current configuration.
    pub fn crm_client(&self) -> Result<CrmClient, CrmError> {
        CrmClient::from_config(self.http.clone(), &self.config.crm)
    }
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .merge(vicidial::router())
        .merge(crm::router());

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        // Middleware
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether dialer credentials are configured
    vicidial_configured: bool,
    /// Whether a CRM API key is configured
    crm_configured: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        vicidial_configured: state.config.vicidial.is_configured(),
        crm_configured: state.config.crm.is_configured(),
    })
}
