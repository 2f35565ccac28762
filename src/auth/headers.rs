//! Outbound header construction for Cloudflare API calls.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::auth::AuthScheme;
use crate::error::GatewayError;

pub const X_AUTH_EMAIL: HeaderName = HeaderName::from_static("x-auth-email");
pub const X_AUTH_KEY: HeaderName = HeaderName::from_static("x-auth-key");

/// Scheme chosen for a credential plus the headers that express it.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedAuth {
    pub scheme: AuthScheme,
    headers: Vec<(HeaderName, String)>,
}

impl ResolvedAuth {
    /// Header pairs in insertion order.
    #[cfg(test)]
    pub fn headers(&self) -> &[(HeaderName, String)] {
        &self.headers
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Convert to a wire header map. Credential headers are marked sensitive.
    pub fn header_map(&self) -> Result<HeaderMap, GatewayError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let mut header_value = HeaderValue::from_str(value).map_err(|_| {
                GatewayError::Validation(format!(
                    "credential contains characters not allowed in the {} header",
                    name
                ))
            })?;
            if *name != CONTENT_TYPE {
                header_value.set_sensitive(true);
            }
            map.insert(name.clone(), header_value);
        }
        Ok(map)
    }
}

impl std::fmt::Debug for ResolvedAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ResolvedAuth")
            .field("scheme", &self.scheme)
            .field("headers", &names)
            .finish()
    }
}

/// Build the header set for `scheme`. Pure: the same input always yields the
/// same output.
pub fn build_headers(email: &str, secret: &str, scheme: AuthScheme) -> ResolvedAuth {
    let headers = match scheme {
        AuthScheme::Token => vec![
            (AUTHORIZATION, format!("Bearer {}", secret)),
            (CONTENT_TYPE, "application/json".to_string()),
        ],
        AuthScheme::Key => vec![
            (X_AUTH_EMAIL, email.to_string()),
            (X_AUTH_KEY, secret.to_string()),
            (CONTENT_TYPE, "application/json".to_string()),
        ],
    };
    ResolvedAuth { scheme, headers }
}
