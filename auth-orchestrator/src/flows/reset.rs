use std::sync::Arc;
use std::time::Duration;

use platform_core::error::FlowError;
use secrecy::{ExposeSecret, Secret};
use serde_json::json;

use crate::models::LinkCredentials;
use crate::services::{metrics, Endpoint, IdentityClient};
use crate::utils::PasswordPolicy;

use super::{Navigation, OperationLock};

/// How long the confirmation screen stays up before sign-in.
pub const SIGNIN_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Two-phase password reset.
///
/// Phase one asks for the email and reports "sent" on any accepted request.
/// Phase two is addressed by the emailed `(uid, token)` pair, taken verbatim,
/// and applies the same password policy as signup before anything leaves the
/// machine. The phases are separate pages, so each gets its own in-flight
/// guard.
pub struct PasswordResetFlow {
    client: Arc<IdentityClient>,
    request_lock: OperationLock,
    confirm_lock: OperationLock,
}

impl PasswordResetFlow {
    pub fn new(client: Arc<IdentityClient>) -> Self {
        Self {
            client,
            request_lock: OperationLock::new(),
            confirm_lock: OperationLock::new(),
        }
    }

    /// Ask for a reset email.
    pub async fn request(&self, email: &str) -> Result<Navigation, FlowError> {
        let _permit = self.request_lock.acquire()?;

        if email.trim().is_empty() {
            return Err(FlowError::validation("Email is required"));
        }

        match self
            .client
            .post(Endpoint::ResetRequest, &json!({"email": email}))
            .await
        {
            Ok(_) => {
                metrics::record_flow_outcome("reset_request", "success");
                tracing::info!(email = %email, "reset email requested");
                Ok(Navigation::ResetEmailSent)
            }
            Err(err) => {
                metrics::record_flow_outcome("reset_request", "failure");
                tracing::warn!(error = %err, "reset request rejected");
                Err(err)
            }
        }
    }

    /// Set the new password using the emailed link pair.
    ///
    /// Both local checks must hold before the call goes out. A rejected
    /// submission surfaces the server's message and leaves the entered
    /// values with the caller for another attempt.
    pub async fn confirm(
        &self,
        link: LinkCredentials,
        new_password: &Secret<String>,
        confirm_password: &Secret<String>,
    ) -> Result<Navigation, FlowError> {
        let _permit = self.confirm_lock.acquire()?;

        if new_password.expose_secret() != confirm_password.expose_secret() {
            return Err(FlowError::validation("Passwords do not match"));
        }

        let strength = PasswordPolicy::check(new_password.expose_secret());
        if !strength.is_valid {
            return Err(FlowError::Validation(strength.message));
        }

        let body = json!({
            "uid": link.uid,
            "token": link.token,
            "new_password": new_password.expose_secret(),
        });

        match self.client.post(Endpoint::ResetConfirm, &body).await {
            Ok(_) => {
                metrics::record_flow_outcome("reset_confirm", "success");
                tracing::info!("password reset confirmed");
                Ok(Navigation::SignInAfter(SIGNIN_REDIRECT_DELAY))
            }
            Err(err) => {
                metrics::record_flow_outcome("reset_confirm", "failure");
                tracing::warn!(error = %err, "password reset rejected");
                Err(err)
            }
        }
    }
}
