use serde::{Deserialize, Serialize};

/// Authorization header scheme.
///
/// The identity service runs two token subsystems with different header
/// prefixes; which one applies is a property of the endpoint, so the scheme
/// travels with the token instead of being a global constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthScheme {
    Bearer,
    Token,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::Token => "Token",
        }
    }

    /// Compose the full Authorization header value for a raw token.
    pub fn header_value(&self, raw_token: &str) -> String {
        format!("{} {}", self.as_str(), raw_token)
    }
}

/// Tokens handed back by a successful authentication exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub scheme: AuthScheme,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            scheme: AuthScheme::Bearer,
            refresh_token: None,
        }
    }

    pub fn with_refresh(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }
}
