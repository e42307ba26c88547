//! Identity flows.
//!
//! Each flow validates locally, makes at most one identity call at a time,
//! writes to the session store only on success, and reports where the UI
//! should go next as a [`Navigation`] value. Failures come back as
//! [`FlowError`](platform_core::error::FlowError); nothing lower-level
//! escapes a flow.

pub mod login;
pub mod logout;
pub mod oauth;
pub mod otp;
pub mod registration;
pub mod reset;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use platform_core::error::FlowError;
use serde_json::Value;

use crate::models::{SessionTokens, UserProfile};
use crate::services::GENERIC_ERROR_MESSAGE;
use crate::session::SessionStore;

pub use login::CredentialLoginFlow;
pub use logout::LogoutFlow;
pub use oauth::{CallbackQuery, FederatedLoginFlow};
pub use otp::OtpChallenge;
pub use registration::{RegistrationFlow, RegistrationState};
pub use reset::PasswordResetFlow;

/// Where the UI should take the user after a flow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Proceed to the OTP entry step.
    VerifyOtp,
    /// Enter the protected area.
    Dashboard,
    /// Fall back to the sign-in screen.
    SignIn,
    /// Show the confirmation, then go to sign-in once the delay elapses.
    /// The consumer owns the actual wait.
    SignInAfter(Duration),
    /// Leave the application for an external URL (the OAuth provider).
    External(String),
    /// Stay put and show the "check your email" confirmation.
    ResetEmailSent,
}

/// One-submission-at-a-time guard.
///
/// The flow equivalent of disabling the submit control while a call is in
/// flight: the first caller gets a permit, a concurrent second caller gets
/// [`FlowError::InFlight`] and no network traffic happens on its behalf.
#[derive(Debug, Default)]
pub struct OperationLock {
    busy: AtomicBool,
}

impl OperationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> Result<OperationPermit<'_>, FlowError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Ok(OperationPermit { busy: &self.busy })
        } else {
            Err(FlowError::InFlight)
        }
    }
}

/// Permit released when dropped, re-enabling the control.
#[derive(Debug)]
pub struct OperationPermit<'a> {
    busy: &'a AtomicBool,
}

impl Drop for OperationPermit<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Condense a validator report into the one message the form shows.
pub(crate) fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Establish a session from a `{token, user}` authentication payload.
///
/// Shared by credential login and OTP verification, which answer with the
/// same shape. A success payload with no readable token is treated like an
/// unreadable response.
pub(crate) fn establish_bearer_session(
    sessions: &SessionStore,
    payload: &Value,
) -> Result<(), FlowError> {
    let token = payload
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| FlowError::Transport(GENERIC_ERROR_MESSAGE.to_string()))?;

    let profile = payload
        .get("user")
        .and_then(|user| serde_json::from_value::<UserProfile>(user.clone()).ok());

    sessions.establish(SessionTokens::bearer(token), profile);
    Ok(())
}
