//! Cloudflare credential handling.
//!
//! # Data Flow
//! ```text
//! inbound body (email, apiKey, mode)
//!     → Credential (per request, never persisted)
//!     → classifier.rs (pick bearer token vs. email/key)
//!     → headers.rs (ResolvedAuth: scheme + outbound header set)
//!     → cloudflare client
//! ```
//!
//! # Design Decisions
//! - Classification and header building are pure functions
//! - The chosen scheme travels next to the headers, never inside them
//! - The `auto` heuristic is best-effort; callers needing certainty pass an
//!   explicit mode

pub mod classifier;
pub mod headers;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use classifier::classify;
pub use headers::{build_headers, ResolvedAuth};

/// Authentication mode requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Guess the scheme from the shape of the secret.
    #[default]
    Auto,
    /// Always send the secret as a bearer API token.
    Token,
    /// Always send the secret as a Global API Key with the account email.
    Key,
}

impl AuthMode {
    /// Parse the wire representation (`auto`, `token`, `key`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Self::Auto),
            "token" => Some(Self::Token),
            "key" => Some(Self::Key),
            _ => None,
        }
    }
}

/// Authentication scheme actually used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    Token,
    Key,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Key => "key",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials supplied with a single inbound request.
#[derive(Clone)]
pub struct Credential {
    pub email: String,
    pub secret: String,
    pub mode: AuthMode,
}

impl Credential {
    pub fn new(email: impl Into<String>, secret: impl Into<String>, mode: AuthMode) -> Self {
        Self {
            email: email.into(),
            secret: secret.into(),
            mode,
        }
    }

    /// Classify the secret and build the outbound headers for it.
    pub fn resolve(&self) -> ResolvedAuth {
        let scheme = classify(&self.secret, self.mode);
        build_headers(&self.email, &self.secret, scheme)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("secret", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_parse() {
        assert_eq!(AuthMode::parse("auto"), Some(AuthMode::Auto));
        assert_eq!(AuthMode::parse("token"), Some(AuthMode::Token));
        assert_eq!(AuthMode::parse("key"), Some(AuthMode::Key));
        assert_eq!(AuthMode::parse("Token"), None);
        assert_eq!(AuthMode::parse("bearer"), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new("ops@example.com", "super-secret-key", AuthMode::Key);
        let rendered = format!("{:?}", credential);
        assert!(rendered.contains("ops@example.com"));
        assert!(!rendered.contains("super-secret-key"));
    }

    #[test]
    fn test_resolve_uses_requested_mode() {
        let credential = Credential::new("ops@example.com", "eyJhbGciOiJIUzI1NiJ9", AuthMode::Key);
        assert_eq!(credential.resolve().scheme, AuthScheme::Key);

        let credential = Credential::new("ops@example.com", "eyJhbGciOiJIUzI1NiJ9", AuthMode::Auto);
        assert_eq!(credential.resolve().scheme, AuthScheme::Token);
    }

    #[test]
    fn test_scheme_serializes_lowercase() {
        assert_eq!(serde_json::to_value(AuthScheme::Token).unwrap(), "token");
        assert_eq!(AuthScheme::Key.to_string(), "key");
    }
}
