//! Request handling: request IDs and body validation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the caller sent none
//! - Parse the JSON body and check required fields
//! - Turn loosely-typed JSON into typed gateway inputs, applying defaults
//!
//! # Design Decisions
//! - A field counts as missing when it is absent or falsy (`null`, `false`,
//!   `0`, `""`); all missing fields are reported at once, in request order
//! - Optional fields that are absent or `null` take the configured default
//! - Values of the wrong type are rejected rather than coerced

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderName, HeaderValue, Request, StatusCode};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::auth::{AuthMode, Credential};
use crate::cloudflare::{CertificateAuthority, SslEnableRequest};
use crate::config::RequestDefaults;
use crate::error::GatewayError;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID generator backed by UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID a request was tagged with.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Unwrap the buffered body. A rejection (oversized or unreadable body)
/// becomes a validation failure so it is rendered like any other.
pub fn read_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, GatewayError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::Validation("request body too large".to_string())
        } else {
            GatewayError::Validation(format!(
                "failed to read request body: {}",
                rejection.body_text()
            ))
        }
    })
}

const TEST_REQUIRED: &[&str] = &["email", "apiKey"];
const ADD_SSL_REQUIRED: &[&str] = &["email", "zoneId", "apiKey"];

/// Validated body of `POST /api/test`.
#[derive(Debug)]
pub struct TestConnectionRequest {
    pub credential: Credential,
}

impl TestConnectionRequest {
    pub fn from_body(body: &[u8], defaults: &RequestDefaults) -> Result<Self, GatewayError> {
        let fields = parse_body(body, TEST_REQUIRED)?;
        Ok(Self {
            credential: credential(&fields, defaults)?,
        })
    }
}

/// Validated body of `POST /api/add-ssl`.
#[derive(Debug)]
pub struct AddSslRequest {
    pub credential: Credential,
    pub ssl: SslEnableRequest,
}

impl AddSslRequest {
    pub fn from_body(body: &[u8], defaults: &RequestDefaults) -> Result<Self, GatewayError> {
        let fields = parse_body(body, ADD_SSL_REQUIRED)?;
        let credential = credential(&fields, defaults)?;

        let enabled = match optional(&fields, "enabled") {
            None => defaults.enabled,
            Some(Value::Bool(enabled)) => *enabled,
            Some(_) => return Err(invalid("enabled", "must be a boolean")),
        };

        let certificate_authority = match optional_str(&fields, "ca")? {
            None => defaults.certificate_authority,
            Some(ca) => CertificateAuthority::parse(ca).ok_or_else(|| {
                invalid("ca", "must be one of ssl_com, lets_encrypt, digicert")
            })?,
        };

        Ok(Self {
            credential,
            ssl: SslEnableRequest {
                zone_id: required_str(&fields, "zoneId")?.to_string(),
                enabled,
                certificate_authority,
            },
        })
    }
}

/// Parse `body` as JSON and check that every `required` field is truthy.
pub fn parse_body(body: &[u8], required: &[&str]) -> Result<Map<String, Value>, GatewayError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| GatewayError::Validation("request body must be valid JSON".to_string()))?;

    let fields = match value {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !fields.get(*name).is_some_and(is_truthy))
        .collect();

    if !missing.is_empty() {
        return Err(GatewayError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    Ok(fields)
}

/// JavaScript-style truthiness, as browsers submitting the form expect.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn credential(fields: &Map<String, Value>, defaults: &RequestDefaults) -> Result<Credential, GatewayError> {
    let mode = match optional_str(fields, "mode")? {
        None | Some("") => defaults.mode,
        Some(mode) => AuthMode::parse(mode)
            .ok_or_else(|| invalid("mode", "must be one of auto, token, key"))?,
    };
    Ok(Credential::new(
        required_str(fields, "email")?,
        required_str(fields, "apiKey")?,
        mode,
    ))
}

fn required_str<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str, GatewayError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(name, "must be a string"))
}

fn optional<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn optional_str<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<Option<&'a str>, GatewayError> {
    match optional(fields, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(invalid(name, "must be a string")),
    }
}

fn invalid(field: &str, reason: &str) -> GatewayError {
    GatewayError::Validation(format!("field `{}` {}", field, reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthScheme;

    fn defaults() -> RequestDefaults {
        RequestDefaults::default()
    }

    fn message(err: GatewayError) -> String {
        assert!(matches!(err, GatewayError::Validation(_)));
        err.to_string()
    }

    #[test]
    fn test_invalid_json() {
        let err = TestConnectionRequest::from_body(b"{not json", &defaults()).unwrap_err();
        assert_eq!(message(err), "request body must be valid JSON");

        let err = TestConnectionRequest::from_body(b"", &defaults()).unwrap_err();
        assert_eq!(message(err), "request body must be valid JSON");
    }

    #[test]
    fn test_missing_fields_listed_in_order() {
        let err = TestConnectionRequest::from_body(b"{}", &defaults()).unwrap_err();
        assert_eq!(message(err), "missing required fields: email, apiKey");

        let err = AddSslRequest::from_body(br#"{"email":"a@b.com"}"#, &defaults()).unwrap_err();
        assert_eq!(message(err), "missing required fields: zoneId, apiKey");
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        let body = br#"{"email":"","apiKey":null,"zoneId":0}"#;
        let err = AddSslRequest::from_body(body, &defaults()).unwrap_err();
        assert_eq!(message(err), "missing required fields: email, zoneId, apiKey");

        let body = br#"{"email":false,"apiKey":"abc"}"#;
        let err = TestConnectionRequest::from_body(body, &defaults()).unwrap_err();
        assert_eq!(message(err), "missing required fields: email");
    }

    #[test]
    fn test_non_object_body_misses_everything() {
        let err = TestConnectionRequest::from_body(b"[1,2]", &defaults()).unwrap_err();
        assert_eq!(message(err), "missing required fields: email, apiKey");

        let err = TestConnectionRequest::from_body(b"null", &defaults()).unwrap_err();
        assert_eq!(message(err), "missing required fields: email, apiKey");
    }

    #[test]
    fn test_wrong_types_rejected() {
        let err = TestConnectionRequest::from_body(br#"{"email":"a@b.com","apiKey":42}"#, &defaults())
            .unwrap_err();
        assert_eq!(message(err), "field `apiKey` must be a string");

        let body = br#"{"email":"a@b.com","apiKey":"k","zoneId":"z","enabled":"yes"}"#;
        let err = AddSslRequest::from_body(body, &defaults()).unwrap_err();
        assert_eq!(message(err), "field `enabled` must be a boolean");
    }

    #[test]
    fn test_unknown_mode_and_ca_rejected() {
        let body = br#"{"email":"a@b.com","apiKey":"k","mode":"bearer"}"#;
        let err = TestConnectionRequest::from_body(body, &defaults()).unwrap_err();
        assert_eq!(message(err), "field `mode` must be one of auto, token, key");

        let body = br#"{"email":"a@b.com","apiKey":"k","zoneId":"z","ca":"acme"}"#;
        let err = AddSslRequest::from_body(body, &defaults()).unwrap_err();
        assert_eq!(message(err), "field `ca` must be one of ssl_com, lets_encrypt, digicert");
    }

    #[test]
    fn test_defaults_applied() {
        let body = br#"{"email":"a@b.com","apiKey":"abcd1234","zoneId":"zone-1","mode":null}"#;
        let request = AddSslRequest::from_body(body, &defaults()).unwrap();
        assert_eq!(request.credential.mode, AuthMode::Auto);
        assert_eq!(request.credential.resolve().scheme, AuthScheme::Key);
        assert_eq!(request.ssl.zone_id, "zone-1");
        assert!(request.ssl.enabled);
        assert_eq!(request.ssl.certificate_authority, CertificateAuthority::SslCom);
    }

    #[test]
    fn test_configured_defaults_used() {
        let configured = RequestDefaults {
            mode: AuthMode::Token,
            enabled: false,
            certificate_authority: CertificateAuthority::Digicert,
        };
        let body = br#"{"email":"a@b.com","apiKey":"abcd1234","zoneId":"zone-1"}"#;
        let request = AddSslRequest::from_body(body, &configured).unwrap();
        assert_eq!(request.credential.mode, AuthMode::Token);
        assert!(!request.ssl.enabled);
        assert_eq!(request.ssl.certificate_authority, CertificateAuthority::Digicert);
    }

    #[test]
    fn test_explicit_fields() {
        let body = br#"{"email":"a@b.com","apiKey":"abcd1234","zoneId":"zone-1",
                        "mode":"token","enabled":false,"ca":"lets_encrypt"}"#;
        let request = AddSslRequest::from_body(body, &defaults()).unwrap();
        assert_eq!(request.credential.mode, AuthMode::Token);
        assert_eq!(request.credential.email, "a@b.com");
        assert!(!request.ssl.enabled);
        assert_eq!(request.ssl.certificate_authority, CertificateAuthority::LetsEncrypt);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&serde_json::json!(0)));
        assert!(!is_truthy(&serde_json::json!(0.0)));
        assert!(!is_truthy(&serde_json::json!("")));
        assert!(is_truthy(&serde_json::json!("0")));
        assert!(is_truthy(&serde_json::json!([])));
        assert!(is_truthy(&serde_json::json!({})));
        assert!(is_truthy(&serde_json::json!(-1)));
    }

    #[test]
    fn test_request_id_generation() {
        let request = Request::builder().body(()).unwrap();
        let id = MakeRequestUuid.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
        assert_eq!(request_id(&request), "unknown");
    }
}
