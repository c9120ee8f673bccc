//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router and
//! `FakeUpstream`, an in-process HTTP server that stands in for the dialer or
//! the CRM and records every request it receives.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{self, header, HeaderMap, Method, Request, Response, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use http_body_util::BodyExt;
use leadrelay_server::api::{create_router, AppState};
use leadrelay_server::config::Config;
use tokio::task::JoinHandle;
use tower::ServiceExt;

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a test app with the default test config.
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(config.clone()).expect("Failed to build app state");
        Self {
            router: create_router(state),
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// POST a JSON body.
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        let request = Self::request(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.oneshot(request).await
    }

    /// POST a URL-encoded form body.
    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        let request = Self::request(Method::POST, uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.oneshot(request).await
    }

    /// Send a GET request.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Self::request(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.oneshot(request).await
    }
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("Response body is not JSON")
}

/// Test config with both upstreams pointed at `upstream`.
pub fn config_for(upstream: &FakeUpstream) -> Config {
    let mut config = Config::default_for_test();
    config.vicidial.base_url = Some(format!("{}/vicidial/non_agent_api.php", upstream.url));
    config.crm.base_url = format!("{}/v1", upstream.url);
    config
}

// ============================================================================
// Fake Upstream
// ============================================================================

/// A request captured by [`FakeUpstream`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    /// Decoded query parameters in wire order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or_default())
            .expect("Invalid query string")
    }

    /// Value of a decoded query parameter.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Recorded body is not JSON")
    }

    /// Value of a header as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type ReplyFn = Arc<dyn Fn(&RecordedRequest) -> axum::response::Response + Send + Sync>;

#[derive(Clone)]
struct FakeState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    reply: ReplyFn,
}

/// A running fake upstream bound to a random port.
pub struct FakeUpstream {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Base URL (e.g., `http://127.0.0.1:12345`).
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _handle: JoinHandle<()>,
}

impl FakeUpstream {
    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    /// Wait until at least `count` requests arrived (for background work).
    pub async fn wait_for_requests(&self, count: usize) -> Vec<RecordedRequest> {
        for _ in 0..100 {
            let requests = self.requests();
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.requests()
    }
}

async fn record(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> axum::response::Response {
    let request = RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    let response = (state.reply)(&request);
    state
        .requests
        .lock()
        .expect("requests lock poisoned")
        .push(request);
    response
}

/// Spawn a fake upstream answering every request with `reply`.
pub async fn spawn_fake_upstream<F>(reply: F) -> FakeUpstream
where
    F: Fn(&RecordedRequest) -> axum::response::Response + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        requests: requests.clone(),
        reply: Arc::new(reply),
    };
    let router = Router::new().fallback(record).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake upstream failed");
    });

    FakeUpstream {
        addr,
        url,
        requests,
        _handle: handle,
    }
}

/// Plain-text 200 reply, like the dialer's non-agent API.
pub fn text_reply(body: &'static str) -> axum::response::Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "text/html; charset=UTF-8")], body).into_response()
}

/// JSON reply with the given status.
pub fn json_reply(status: StatusCode, body: serde_json::Value) -> axum::response::Response {
    (status, axum::Json(body)).into_response()
}
