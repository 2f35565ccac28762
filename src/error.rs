//! Error taxonomy for the gateway.

use thiserror::Error;

/// Errors that can occur while serving a request.
///
/// Every per-request variant renders as `{success: false, message}` with a
/// `400` status; none of them is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed or missing inbound fields.
    #[error("{0}")]
    Validation(String),

    /// Cloudflare rejected the credentials.
    #[error("{0}")]
    Authentication(String),

    /// Network, DNS or connection failure talking to Cloudflare.
    #[error("{0}")]
    Transport(String),

    /// The outbound call exceeded its time bound.
    #[error("request to Cloudflare timed out after {0} seconds")]
    Timeout(u64),

    /// Cloudflare answered with a body that is not the expected JSON.
    #[error("invalid response from Cloudflare: {0}")]
    Decode(String),

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl GatewayError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Authentication(_) => "authentication",
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::Decode(_) => "decode",
            Self::ClientBuild(_) => "client_build",
        }
    }
}
