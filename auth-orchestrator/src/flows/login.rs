use std::sync::Arc;

use platform_core::error::FlowError;
use secrecy::ExposeSecret;
use serde_json::json;
use validator::Validate;

use crate::models::Credentials;
use crate::services::{metrics, Endpoint, IdentityClient};
use crate::session::SessionStore;

use super::{establish_bearer_session, first_validation_message, Navigation, OperationLock};

/// Email/password exchange for a session token. One round trip; a rejected
/// attempt keeps the form as the user left it and the user resubmitting is
/// the retry mechanism. Password strength is deliberately not checked here,
/// only at signup and reset.
pub struct CredentialLoginFlow {
    client: Arc<IdentityClient>,
    sessions: Arc<SessionStore>,
    lock: OperationLock,
}

impl CredentialLoginFlow {
    pub fn new(client: Arc<IdentityClient>, sessions: Arc<SessionStore>) -> Self {
        Self {
            client,
            sessions,
            lock: OperationLock::new(),
        }
    }

    pub async fn submit(&self, credentials: Credentials) -> Result<Navigation, FlowError> {
        let _permit = self.lock.acquire()?;

        credentials
            .validate()
            .map_err(|errors| FlowError::Validation(first_validation_message(&errors)))?;

        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });

        match self.client.post(Endpoint::Login, &body).await {
            Ok(payload) => {
                establish_bearer_session(&self.sessions, &payload)?;
                metrics::record_flow_outcome("login", "success");
                tracing::info!(email = %credentials.email, "signed in");
                Ok(Navigation::Dashboard)
            }
            Err(err) => {
                metrics::record_flow_outcome("login", "failure");
                tracing::warn!(error = %err, "sign-in rejected");
                Err(err)
            }
        }
    }
}
