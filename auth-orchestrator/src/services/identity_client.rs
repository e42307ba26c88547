use std::time::Duration;

use anyhow::Result;
use platform_core::error::FlowError;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::IdentityServiceSettings;
use crate::models::AuthScheme;

/// Shown whenever the identity service gives us nothing readable: transport
/// failures, empty bodies, bodies we cannot parse.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Every identity-service endpoint this client talks to.
///
/// Keeping the method, path and Authorization scheme in one table means a new
/// endpoint cannot be added without deciding all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    VerifyOtp,
    ResendOtp,
    Login,
    Logout,
    OauthAuthorize,
    OauthExchange,
    ResetRequest,
    ResetConfirm,
    Activate,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::OauthAuthorize => Method::GET,
            _ => Method::POST,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Register => "/auth/users/",
            Endpoint::VerifyOtp => "/auth/signup/verify",
            Endpoint::ResendOtp => "/auth/resend-otp",
            Endpoint::Login => "/auth/login",
            Endpoint::Logout => "/auth/token/logout",
            Endpoint::OauthAuthorize | Endpoint::OauthExchange => "/auth/o/google-oauth2/",
            Endpoint::ResetRequest => "/auth/users/reset_password/",
            Endpoint::ResetConfirm => "/auth/users/reset_password_confirm/",
            Endpoint::Activate => "/auth/users/activation/",
        }
    }

    /// Authorization scheme the endpoint expects.
    ///
    /// The token-backed endpoints and the session credential use different
    /// prefixes; both are live on the backend, so this stays per-endpoint.
    pub fn auth_scheme(&self) -> AuthScheme {
        match self {
            Endpoint::Logout => AuthScheme::Token,
            _ => AuthScheme::Bearer,
        }
    }
}

/// HTTP client for the identity service.
///
/// All error response shapes are normalized here, once, into [`FlowError`];
/// no reqwest error ever crosses this boundary.
pub struct IdentityClient {
    http: Client,
    settings: IdentityServiceSettings,
}

impl IdentityClient {
    pub fn new(settings: IdentityServiceSettings) -> Result<Self> {
        // Cookies carry the anti-forgery state binding across the two OAuth
        // phases; the timeout bounds every identity call.
        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()?;

        Ok(Self { http, settings })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    /// POST a JSON body.
    pub async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value, FlowError> {
        let request = self.http.post(self.url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }

    /// POST with query parameters and ambient cookies, no body.
    pub async fn post_query(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<Value, FlowError> {
        let request = self.http.post(self.url(endpoint)).query(query);
        self.execute(endpoint, request).await
    }

    /// GET with query parameters and ambient cookies.
    pub async fn get_query(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<Value, FlowError> {
        let request = self.http.get(self.url(endpoint)).query(query);
        self.execute(endpoint, request).await
    }

    /// POST with an Authorization header composed from the endpoint's scheme.
    pub async fn post_authorized(
        &self,
        endpoint: Endpoint,
        raw_token: &str,
    ) -> Result<Value, FlowError> {
        let request = self
            .http
            .post(self.url(endpoint))
            .header(AUTHORIZATION, endpoint.auth_scheme().header_value(raw_token));
        self.execute(endpoint, request).await
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.settings.url, endpoint.path())
    }

    async fn execute(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, FlowError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(endpoint = ?endpoint, error = %e, "identity request failed to send");
            FlowError::Transport(GENERIC_ERROR_MESSAGE.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            // Several endpoints answer 2xx with no body at all.
            Ok(serde_json::from_str(&body).unwrap_or(Value::Null))
        } else {
            tracing::warn!(endpoint = ?endpoint, status = %status, "identity request rejected");
            Err(normalize_error(status, &body))
        }
    }
}

/// Extract a human message from whichever field the backend used this time.
///
/// Checked in order: `detail`, `error`, `message`. Anything else falls back
/// to the generic string.
fn normalize_error(status: StatusCode, body: &str) -> FlowError {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return FlowError::Transport(GENERIC_ERROR_MESSAGE.to_string()),
    };

    let message = ["detail", "error", "message"]
        .iter()
        .find_map(|key| parsed.get(key).and_then(Value::as_str))
        .map(str::to_string);

    match message {
        Some(message) => FlowError::Server { message },
        None => {
            tracing::warn!(status = %status, "error body carried no readable message field");
            FlowError::Server {
                message: GENERIC_ERROR_MESSAGE.to_string(),
            }
        }
    }
}
