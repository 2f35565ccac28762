//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use ssl_gateway::{GatewayConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

pub const GOOD_EMAIL: &str = "a@b.com";
pub const GOOD_KEY: &str = "0123456789abcdef0123456789abcdef01234";
pub const GOOD_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.good-token";

/// A request the mock Cloudflare received.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Captured {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone, Default)]
pub struct MockState {
    pub captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockState {
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    match header("authorization") {
        Some(auth) => auth == format!("Bearer {}", GOOD_TOKEN),
        None => header("x-auth-email") == Some(GOOD_EMAIL) && header("x-auth-key") == Some(GOOD_KEY),
    }
}

async fn user(State(state): State<MockState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    state.captured.lock().unwrap().push(Captured {
        path: "/user".into(),
        headers: headers.clone(),
        body: Value::Null,
    });

    if authorized(&headers) {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "errors": [],
                "messages": [],
                "result": {"id": "7c5dae5552338874e5053f2534d2767a", "email": GOOD_EMAIL}
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "errors": [{"code": 6003, "message": "Invalid API Key"}],
                "messages": [],
                "result": null
            })),
        )
    }
}

async fn universal_ssl(
    State(state): State<MockState>,
    Path(zone_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.captured.lock().unwrap().push(Captured {
        path: format!("/zones/{}/ssl/universal/settings", zone_id),
        headers: headers.clone(),
        body: body.clone(),
    });

    if !authorized(&headers) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "errors": [{"code": 10000, "message": "Authentication error"}],
                "messages": [],
                "result": null
            })),
        );
    }

    if zone_id == "missing-zone" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "errors": [{"code": 1001, "message": "Invalid zone identifier"}],
                "messages": [],
                "result": null
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": body
        })),
    )
}

/// Router imitating the two Cloudflare endpoints the gateway uses.
pub fn mock_cloudflare(state: MockState) -> Router {
    Router::new()
        .route("/client/v4/user", get(user))
        .route(
            "/client/v4/zones/{zone_id}/ssl/universal/settings",
            patch(universal_ssl),
        )
        .with_state(state)
}

/// Serve `app` on an ephemeral port and return its address.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Start a mock Cloudflare and return its API base URL plus captured state.
pub async fn start_mock_cloudflare() -> (String, MockState) {
    let state = MockState::default();
    let addr = serve(mock_cloudflare(state.clone())).await;
    (format!("http://{}/client/v4", addr), state)
}

/// An API base nothing is listening on.
#[allow(dead_code)]
pub fn refused_api_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/client/v4", addr)
}

/// A running gateway. Dropping it stops the server.
pub struct TestGateway {
    pub url: String,
    _shutdown: Shutdown,
}

pub async fn start_gateway_with(config: GatewayConfig) -> TestGateway {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway {
        url: format!("http://{}", addr),
        _shutdown: shutdown,
    }
}

pub async fn start_gateway(api_base: &str) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.cloudflare.api_base = api_base.to_string();
    config.cloudflare.timeout_secs = 5;
    start_gateway_with(config).await
}

pub async fn post(url: String, body: Value) -> reqwest::Response {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}
