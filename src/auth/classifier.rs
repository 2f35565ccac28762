//! Credential classification.
//!
//! API tokens are long opaque strings (often JWT-like, starting with `ey`);
//! Global API Keys are short hex strings. An explicit mode always wins over
//! the heuristic.

use crate::auth::{AuthMode, AuthScheme};

/// Secrets longer than this are treated as API tokens in `auto` mode.
pub const TOKEN_LENGTH_THRESHOLD: usize = 40;

/// Decide which authentication scheme a secret should be sent with.
pub fn classify(secret: &str, requested: AuthMode) -> AuthScheme {
    match requested {
        AuthMode::Token => AuthScheme::Token,
        AuthMode::Key => AuthScheme::Key,
        AuthMode::Auto => {
            if secret.starts_with("ey") || secret.chars().count() > TOKEN_LENGTH_THRESHOLD {
                AuthScheme::Token
            } else {
                AuthScheme::Key
            }
        }
    }
}
