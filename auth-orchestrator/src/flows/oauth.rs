use std::sync::Arc;

use platform_core::error::FlowError;
use serde::Deserialize;
use serde_json::Value;

use crate::models::{AuthScheme, SessionTokens};
use crate::services::{metrics, Endpoint, IdentityClient, GENERIC_ERROR_MESSAGE};
use crate::session::SessionStore;

use super::{Navigation, OperationLock};

/// Query string the provider sends the browser back with.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Two-phase OAuth2 authorization-code login.
///
/// The phases share no in-memory state; the browser's round trip through the
/// provider is the only coupling. The identity service binds the anti-forgery
/// `state` to the caller's cookie session during initiate and checks it on
/// exchange, which is why both calls go out with ambient cookies.
pub struct FederatedLoginFlow {
    client: Arc<IdentityClient>,
    sessions: Arc<SessionStore>,
    redirect_uri: String,
    lock: OperationLock,
}

impl FederatedLoginFlow {
    pub fn new(
        client: Arc<IdentityClient>,
        sessions: Arc<SessionStore>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client,
            sessions,
            redirect_uri: redirect_uri.into(),
            lock: OperationLock::new(),
        }
    }

    /// Ask the identity service where to send the browser.
    ///
    /// On failure there is no navigation at all; the user stays where they
    /// were with the error surfaced.
    pub async fn initiate(&self) -> Result<Navigation, FlowError> {
        let _permit = self.lock.acquire()?;

        let payload = self
            .client
            .get_query(
                Endpoint::OauthAuthorize,
                &[("redirect_uri", self.redirect_uri.as_str())],
            )
            .await?;

        let authorization_url = payload
            .get("authorization_url")
            .and_then(Value::as_str)
            .ok_or_else(|| FlowError::Transport(GENERIC_ERROR_MESSAGE.to_string()))?;

        tracing::info!("redirecting to the provider's authorization page");
        Ok(Navigation::External(authorization_url.to_string()))
    }

    /// Handle the provider redirect.
    ///
    /// A callback missing `code` or `state`, or carrying an `error`, never
    /// reaches the exchange endpoint. The session is written only after a
    /// successful exchange, so an abandoned round trip leaves no partial
    /// session behind. Every failure path lands on sign-in.
    pub async fn callback(&self, query: CallbackQuery) -> Navigation {
        if let Some(error) = query.error {
            tracing::warn!(error = %error, "provider returned an error");
            metrics::record_flow_outcome("oauth", "failure");
            return Navigation::SignIn;
        }

        let (code, state) = match (query.code, query.state) {
            (Some(code), Some(state)) => (code, state),
            _ => {
                tracing::warn!("callback missing code or state");
                metrics::record_flow_outcome("oauth", "failure");
                return Navigation::SignIn;
            }
        };

        let _permit = match self.lock.acquire() {
            Ok(permit) => permit,
            Err(_) => return Navigation::SignIn,
        };

        let exchange = self
            .client
            .post_query(
                Endpoint::OauthExchange,
                &[
                    ("state", state.as_str()),
                    ("code", code.as_str()),
                    ("redirect_uri", self.redirect_uri.as_str()),
                ],
            )
            .await;

        let payload = match exchange {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "code exchange failed");
                metrics::record_flow_outcome("oauth", "failure");
                return Navigation::SignIn;
            }
        };

        let access = payload.get("access").and_then(Value::as_str);
        let refresh = payload.get("refresh").and_then(Value::as_str);

        match access {
            Some(access) => {
                let mut tokens = SessionTokens {
                    access_token: access.to_string(),
                    scheme: AuthScheme::Bearer,
                    refresh_token: None,
                };
                if let Some(refresh) = refresh {
                    tokens = tokens.with_refresh(refresh);
                }

                // The exchange response carries no profile; it is fetched by
                // whichever view needs it, with the session credential.
                self.sessions.establish(tokens, None);
                metrics::record_flow_outcome("oauth", "success");
                tracing::info!("federated sign-in complete");
                Navigation::Dashboard
            }
            None => {
                tracing::warn!("exchange response carried no access token");
                metrics::record_flow_outcome("oauth", "failure");
                Navigation::SignIn
            }
        }
    }
}
