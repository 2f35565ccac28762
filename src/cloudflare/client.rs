//! Cloudflare API client.
//!
//! # Responsibilities
//! - Verify credentials against `GET /user`
//! - Change Universal SSL settings via `PATCH /zones/{id}/ssl/universal/settings`
//! - Normalize every outcome (success, rejection, transport failure) into a
//!   `GatewayResult`
//!
//! # Design Decisions
//! - Exactly one outbound call per operation; no retries
//! - Enable-SSL confirms the request was accepted, never that the
//!   certificate is live (provisioning is asynchronous on Cloudflare's side)
//! - Every outbound call is bounded by `cloudflare.timeout_secs`

use std::time::{Duration, Instant};

use reqwest::{Client, Response, Url};
use serde_json::Value;

use crate::auth::{Credential, ResolvedAuth};
use crate::cloudflare::types::{
    AccountIdentity, CloudflareEnvelope, GatewayResult, SslEnableRequest, UniversalSslSettings,
};
use crate::config::CloudflareConfig;
use crate::error::GatewayError;
use crate::observability::metrics;

const DEFAULT_ACCOUNT: &str = "unknown";
const DEFAULT_AUTH_FAILURE: &str = "authentication failed";

/// Client for the two supported Cloudflare operations.
#[derive(Clone)]
pub struct CloudflareGateway {
    client: Client,
    api_base: Url,
    timeout_secs: u64,
}

impl CloudflareGateway {
    /// Create a gateway from validated configuration.
    pub fn new(config: &CloudflareConfig) -> Result<Self, GatewayError> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| GatewayError::Validation(format!("invalid Cloudflare API base: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ssl-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GatewayError::ClientBuild)?;

        Ok(Self {
            client,
            api_base,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Verify a credential by fetching the account identity.
    pub async fn test_connection(&self, credential: &Credential) -> GatewayResult {
        let auth = credential.resolve();
        let started = Instant::now();

        let outcome = self.fetch_identity(&auth).await;
        metrics::record_upstream_call("test_connection", outcome_label(&outcome), started);

        match outcome {
            Ok(account_email) => {
                tracing::info!(scheme = %auth.scheme, account = %account_email, "Credentials verified");
                let identity = AccountIdentity {
                    scheme: auth.scheme,
                    account_email,
                    message: "authentication succeeded".to_string(),
                };
                match serde_json::to_value(identity) {
                    Ok(payload) => GatewayResult::succeeded(200, payload),
                    Err(e) => GatewayResult::failed(e.to_string()),
                }
            }
            Err(err) => {
                tracing::warn!(scheme = %auth.scheme, kind = err.kind(), error = %err, "Credential check failed");
                err.into()
            }
        }
    }

    /// Change a zone's Universal SSL settings and pass Cloudflare's answer
    /// through unchanged.
    pub async fn enable_ssl(&self, credential: &Credential, request: &SslEnableRequest) -> GatewayResult {
        let auth = credential.resolve();
        let started = Instant::now();

        let outcome = self.patch_universal_ssl(&auth, request).await;
        metrics::record_upstream_call("enable_ssl", outcome_label(&outcome), started);

        match outcome {
            Ok((status, payload)) => {
                let result = GatewayResult::passthrough(status, payload);
                if result.success {
                    tracing::info!(
                        zone_id = %request.zone_id,
                        enabled = request.enabled,
                        ca = request.certificate_authority.as_str(),
                        status,
                        "Universal SSL change accepted"
                    );
                } else {
                    tracing::warn!(zone_id = %request.zone_id, status, "Cloudflare rejected Universal SSL change");
                }
                result
            }
            Err(err) => {
                tracing::warn!(zone_id = %request.zone_id, kind = err.kind(), error = %err, "Universal SSL change failed");
                err.into()
            }
        }
    }

    async fn fetch_identity(&self, auth: &ResolvedAuth) -> Result<String, GatewayError> {
        let url = self.endpoint(&["user"])?;
        let response = self
            .client
            .get(url)
            .headers(auth.header_map()?)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = self.read_json(response).await?;
        let envelope: CloudflareEnvelope =
            serde_json::from_value(body).map_err(|e| GatewayError::Decode(e.to_string()))?;

        if status.is_success() && envelope.success == Some(true) {
            Ok(envelope
                .result_email()
                .unwrap_or(DEFAULT_ACCOUNT)
                .to_string())
        } else {
            Err(GatewayError::Authentication(
                envelope
                    .first_error_message()
                    .unwrap_or(DEFAULT_AUTH_FAILURE)
                    .to_string(),
            ))
        }
    }

    async fn patch_universal_ssl(
        &self,
        auth: &ResolvedAuth,
        request: &SslEnableRequest,
    ) -> Result<(u16, Value), GatewayError> {
        let url = self.endpoint(&["zones", &request.zone_id, "ssl", "universal", "settings"])?;
        let response = self
            .client
            .patch(url)
            .headers(auth.header_map()?)
            .json(&UniversalSslSettings::from(request))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status().as_u16();
        let body = self.read_json(response).await?;
        Ok((status, body))
    }

    /// Append path segments to the API base. Each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Validation("Cloudflare API base cannot be a base URL".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json(&self, response: Response) -> Result<Value, GatewayError> {
        let bytes = response.bytes().await.map_err(|e| self.request_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn request_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout_secs)
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

fn outcome_label<T>(outcome: &Result<T, GatewayError>) -> &'static str {
    match outcome {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(api_base: &str) -> CloudflareGateway {
        CloudflareGateway::new(&CloudflareConfig {
            api_base: api_base.to_string(),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let gw = gateway("https://api.cloudflare.com/client/v4");
        assert_eq!(
            gw.endpoint(&["user"]).unwrap().as_str(),
            "https://api.cloudflare.com/client/v4/user"
        );

        let gw = gateway("https://api.cloudflare.com/client/v4/");
        assert_eq!(
            gw.endpoint(&["zones", "abc", "ssl", "universal", "settings"]).unwrap().as_str(),
            "https://api.cloudflare.com/client/v4/zones/abc/ssl/universal/settings"
        );
    }

    #[test]
    fn test_endpoint_encodes_zone_id() {
        let gw = gateway("https://api.cloudflare.com/client/v4");
        let url = gw.endpoint(&["zones", "abc/def", "ssl"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.cloudflare.com/client/v4/zones/abc%2Fdef/ssl"
        );
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let result = CloudflareGateway::new(&CloudflareConfig {
            api_base: "not a url".into(),
            timeout_secs: 1,
        });
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gw = gateway(&format!("http://{}/client/v4", addr));
        let credential = Credential::new("a@b.com", "abc123", crate::auth::AuthMode::Key);
        let result = gw.test_connection(&credential).await;

        assert!(!result.success);
        assert_eq!(result.status_code, 400);
        assert!(!result.error_message.unwrap_or_default().is_empty());
    }
}
