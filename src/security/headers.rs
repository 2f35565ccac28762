//! Cross-origin headers and the pre-flight short-circuit.
//!
//! # Responsibilities
//! - Attach permissive CORS headers to every JSON response
//! - Answer `OPTIONS` on any path with `200 {}` before routing
//!
//! # Design Decisions
//! - The front end may be hosted anywhere, so any origin is allowed
//! - Only `Content-Type` is accepted as a request header; credentials travel
//!   in the JSON body, never in cookies

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Insert the three CORS headers, replacing any existing values.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Short-circuit `OPTIONS` requests before they reach the router.
pub async fn preflight_middleware(request: Request<Body>, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        tracing::debug!(path = %request.uri().path(), "Answering pre-flight request");
        let mut response = Json(serde_json::json!({})).into_response();
        apply_cors(response.headers_mut());
        return response;
    }
    next.run(request).await
}
