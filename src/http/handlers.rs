//! API handlers.
//!
//! Each handler runs VALIDATING → DISPATCHING → RESPONDING and shares no
//! state with other requests beyond the immutable `AppState`.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
};

use crate::http::request::{read_body, AddSslRequest, TestConnectionRequest};
use crate::http::server::AppState;

/// `POST /api/test`: verify Cloudflare credentials.
pub async fn test_connection(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let parsed = read_body(body)
        .and_then(|body| TestConnectionRequest::from_body(&body, &state.defaults));
    let request = match parsed {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected test request");
            return err.into_response();
        }
    };

    state
        .gateway
        .test_connection(&request.credential)
        .await
        .into_response()
}

/// `POST /api/add-ssl`: change a zone's Universal SSL settings.
pub async fn add_ssl(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let parsed = read_body(body).and_then(|body| AddSslRequest::from_body(&body, &state.defaults));
    let request = match parsed {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected add-ssl request");
            return err.into_response();
        }
    };

    state
        .gateway
        .enable_ssl(&request.credential, &request.ssl)
        .await
        .into_response()
}
