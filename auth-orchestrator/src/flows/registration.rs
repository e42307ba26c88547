use std::sync::{Arc, RwLock};

use platform_core::error::FlowError;
use secrecy::{ExposeSecret, Secret};
use serde_json::{json, Value};
use validator::Validate;

use crate::models::{LinkCredentials, RegistrationProfile};
use crate::services::{metrics, Endpoint, IdentityClient};
use crate::session::SignupHandoff;
use crate::utils::PasswordPolicy;

use super::{first_validation_message, Navigation, OperationLock};

/// Where the signup flow stands.
///
/// `AwaitingOtp` is terminal for this flow; the story continues in
/// [`OtpChallenge`](super::OtpChallenge). A failed submission lands back in
/// `Idle` with the entered values untouched (they belong to the caller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Idle,
    Submitting,
    AwaitingOtp,
}

/// Signup orchestration: local checks, one register call, then hand off
/// `{email, name}` to the verification step.
pub struct RegistrationFlow {
    client: Arc<IdentityClient>,
    handoff: Arc<SignupHandoff>,
    state: RwLock<RegistrationState>,
    lock: OperationLock,
}

impl RegistrationFlow {
    pub fn new(client: Arc<IdentityClient>, handoff: Arc<SignupHandoff>) -> Self {
        Self {
            client,
            handoff,
            state: RwLock::new(RegistrationState::Idle),
            lock: OperationLock::new(),
        }
    }

    pub fn state(&self) -> RegistrationState {
        *self.state.read().expect("state lock poisoned")
    }

    fn set_state(&self, state: RegistrationState) {
        *self.state.write().expect("state lock poisoned") = state;
    }

    /// Submit a signup.
    ///
    /// Every precondition runs before any network traffic: the confirmation
    /// must match and the password must clear the whole policy.
    pub async fn submit(
        &self,
        profile: RegistrationProfile,
        confirm_password: &Secret<String>,
    ) -> Result<Navigation, FlowError> {
        let _permit = self.lock.acquire()?;

        profile
            .validate()
            .map_err(|errors| FlowError::Validation(first_validation_message(&errors)))?;

        if profile.password.expose_secret() != confirm_password.expose_secret() {
            return Err(FlowError::validation("Passwords do not match"));
        }

        let strength = PasswordPolicy::check(profile.password.expose_secret());
        if !strength.is_valid {
            return Err(FlowError::Validation(strength.message));
        }

        self.set_state(RegistrationState::Submitting);

        let body = json!({
            "email": profile.email,
            "name": profile.name,
            "description": profile.description,
            "password": profile.password.expose_secret(),
        });

        match self.client.post(Endpoint::Register, &body).await {
            Ok(_created) => {
                // Only what the OTP step needs survives the submission.
                self.handoff.stage(&profile.email, &profile.name);
                self.set_state(RegistrationState::AwaitingOtp);
                metrics::record_flow_outcome("registration", "success");
                tracing::info!(email = %profile.email, "signup accepted, awaiting verification code");
                Ok(Navigation::VerifyOtp)
            }
            Err(err) => {
                self.set_state(RegistrationState::Idle);
                metrics::record_flow_outcome("registration", "failure");
                tracing::warn!(error = %err, "signup rejected");
                Err(err)
            }
        }
    }

    /// Activate an account from an emailed `(uid, token)` link.
    ///
    /// The pair goes to the service exactly as it arrived; the response's
    /// `detail` is the confirmation text to show.
    pub async fn activate(&self, link: LinkCredentials) -> Result<String, FlowError> {
        let _permit = self.lock.acquire()?;

        let body = json!({"uid": link.uid, "token": link.token});
        let value = self.client.post(Endpoint::Activate, &body).await?;

        metrics::record_flow_outcome("activation", "success");
        Ok(value
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or("Account activated")
            .to_string())
    }
}
