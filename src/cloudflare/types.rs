//! Cloudflare API types and the normalized gateway result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::AuthScheme;
use crate::error::GatewayError;

/// Issuer Cloudflare uses to provision a zone's Universal SSL certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateAuthority {
    #[default]
    SslCom,
    LetsEncrypt,
    Digicert,
}

impl CertificateAuthority {
    /// Parse the Cloudflare API representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ssl_com" => Some(Self::SslCom),
            "lets_encrypt" => Some(Self::LetsEncrypt),
            "digicert" => Some(Self::Digicert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SslCom => "ssl_com",
            Self::LetsEncrypt => "lets_encrypt",
            Self::Digicert => "digicert",
        }
    }
}

/// A request to change a zone's Universal SSL settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SslEnableRequest {
    pub zone_id: String,
    pub enabled: bool,
    pub certificate_authority: CertificateAuthority,
}

/// Body sent to `PATCH /zones/{zone_id}/ssl/universal/settings`.
#[derive(Debug, Serialize)]
pub(crate) struct UniversalSslSettings {
    pub enabled: bool,
    pub certificate_authority: CertificateAuthority,
}

impl From<&SslEnableRequest> for UniversalSslSettings {
    fn from(request: &SslEnableRequest) -> Self {
        Self {
            enabled: request.enabled,
            certificate_authority: request.certificate_authority,
        }
    }
}

/// The common v4 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub errors: Option<Vec<CloudflareErrorInfo>>,
    #[serde(default)]
    pub result: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CloudflareErrorInfo {
    #[serde(default)]
    pub message: Option<String>,
}

impl CloudflareEnvelope {
    pub fn first_error_message(&self) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.first())
            .and_then(|e| e.message.as_deref())
            .filter(|m| !m.is_empty())
    }

    pub fn result_email(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|r| r.get("email"))
            .and_then(Value::as_str)
            .filter(|e| !e.is_empty())
    }
}

/// Payload returned by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountIdentity {
    #[serde(rename = "type")]
    pub scheme: AuthScheme,
    #[serde(rename = "account")]
    pub account_email: String,
    pub message: String,
}

/// Normalized outcome of a single Cloudflare call.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResult {
    pub success: bool,
    pub status_code: u16,
    pub payload: Value,
    pub error_message: Option<String>,
}

impl GatewayResult {
    pub fn succeeded(status_code: u16, payload: Value) -> Self {
        Self {
            success: true,
            status_code,
            payload,
            error_message: None,
        }
    }

    /// Cloudflare's own response, passed through unchanged.
    pub fn passthrough(status_code: u16, payload: Value) -> Self {
        let success = payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or((200..300).contains(&status_code));
        Self {
            success,
            status_code,
            payload,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: 400,
            payload: Value::Null,
            error_message: Some(message.into()),
        }
    }

    /// JSON body for the caller: `{success, ...payload}` or
    /// `{success: false, message}`.
    pub fn body(&self) -> Value {
        if let Some(message) = &self.error_message {
            return serde_json::json!({ "success": false, "message": message });
        }
        match &self.payload {
            Value::Object(fields) => {
                let mut body = fields.clone();
                body.entry("success").or_insert(Value::Bool(self.success));
                Value::Object(body)
            }
            Value::Null => {
                let mut body = Map::new();
                body.insert("success".into(), Value::Bool(self.success));
                Value::Object(body)
            }
            other => other.clone(),
        }
    }
}

impl From<GatewayError> for GatewayResult {
    fn from(err: GatewayError) -> Self {
        Self::failed(err.to_string())
    }
}
