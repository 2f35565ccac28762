//! Response construction.
//!
//! # Responsibilities
//! - Serialize `GatewayResult` and `GatewayError` into HTTP responses
//! - Attach CORS headers to every JSON response
//!
//! # Design Decisions
//! - A status Cloudflare sent that is not a valid HTTP status becomes 400
//! - Callers never see a raw error chain, only `{success: false, message}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::cloudflare::GatewayResult;
use crate::error::GatewayError;
use crate::security::apply_cors;

/// JSON response with CORS headers.
pub fn json_response(status: StatusCode, body: Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    apply_cors(response.headers_mut());
    response
}

impl IntoResponse for GatewayResult {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST);
        json_response(status, self.body())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        GatewayResult::from(self).into_response()
    }
}
