use std::sync::Arc;

use platform_core::error::FlowError;
use platform_core::timer::Countdown;
use serde_json::json;

use crate::services::{metrics, Endpoint, IdentityClient};
use crate::session::{SessionStore, SignupHandoff};

use super::{establish_bearer_session, Navigation, OperationLock};

pub const OTP_LENGTH: usize = 6;
pub const RESEND_COOLDOWN_SECONDS: u64 = 30;

/// The OTP entry step: six one-character cells, a focus index, and the
/// resend cooldown.
///
/// One challenge value exists per visit to the verification step. Dropping
/// it tears the cooldown timer down with it, whichever way the step was
/// left.
pub struct OtpChallenge {
    client: Arc<IdentityClient>,
    sessions: Arc<SessionStore>,
    handoff: Arc<SignupHandoff>,
    cells: [String; OTP_LENGTH],
    focus: usize,
    cooldown: Countdown,
    lock: OperationLock,
}

impl OtpChallenge {
    /// Enter the verification step; the cooldown starts ticking immediately.
    pub fn begin(
        client: Arc<IdentityClient>,
        sessions: Arc<SessionStore>,
        handoff: Arc<SignupHandoff>,
    ) -> Self {
        Self {
            client,
            sessions,
            handoff,
            cells: Default::default(),
            focus: 0,
            cooldown: Countdown::start(RESEND_COOLDOWN_SECONDS),
            lock: OperationLock::new(),
        }
    }

    pub fn focused_cell(&self) -> usize {
        self.focus
    }

    /// Type a digit into a cell; a non-final cell advances the focus.
    pub fn enter_digit(&mut self, index: usize, digit: char) {
        if index >= OTP_LENGTH || !digit.is_ascii_digit() {
            return;
        }

        self.cells[index] = digit.to_string();
        if index < OTP_LENGTH - 1 {
            self.focus = index + 1;
        } else {
            self.focus = index;
        }
    }

    /// Backspace: clears a filled cell, or retreats from an empty one.
    pub fn erase(&mut self, index: usize) {
        if index >= OTP_LENGTH {
            return;
        }

        if self.cells[index].is_empty() {
            if index > 0 {
                self.focus = index - 1;
            }
        } else {
            self.cells[index].clear();
            self.focus = index;
        }
    }

    /// The cells joined in order.
    pub fn code(&self) -> String {
        self.cells.concat()
    }

    pub fn cooldown_remaining(&self) -> u64 {
        self.cooldown.remaining()
    }

    /// Resend unlocks exactly when the cooldown hits zero.
    pub fn can_resend(&self) -> bool {
        self.cooldown.finished()
    }

    /// Verify the entered code against the email staged by signup.
    ///
    /// Anything short of six digits fails locally; the network is never
    /// touched. On a rejected code the cells stay as typed, ready to edit.
    pub async fn submit(&mut self) -> Result<Navigation, FlowError> {
        let _permit = self.lock.acquire()?;

        let code = self.code();
        if code.len() != OTP_LENGTH {
            return Err(FlowError::validation("Enter the 6-digit code"));
        }

        let pending = self
            .handoff
            .pending()
            .ok_or_else(|| FlowError::validation("No signup awaiting verification"))?;

        let body = json!({"otp": code, "email": pending.email});

        match self.client.post(Endpoint::VerifyOtp, &body).await {
            Ok(payload) => {
                establish_bearer_session(&self.sessions, &payload)?;
                self.handoff.discard();
                metrics::record_flow_outcome("otp_verify", "success");
                tracing::info!(email = %pending.email, "account verified, session established");
                Ok(Navigation::Dashboard)
            }
            Err(err) => {
                metrics::record_flow_outcome("otp_verify", "failure");
                tracing::warn!(error = %err, "verification code rejected");
                Err(err)
            }
        }
    }

    /// Ask for a fresh code for the staged email.
    ///
    /// The counter restarts on completion whether or not the call went
    /// through; the reset sits before the outcome is even inspected so that
    /// stays visibly unconditional.
    pub async fn resend(&mut self) -> Result<(), FlowError> {
        let _permit = self.lock.acquire()?;

        if !self.can_resend() {
            return Err(FlowError::validation(
                "Please wait before requesting another code",
            ));
        }

        let pending = self
            .handoff
            .pending()
            .ok_or_else(|| FlowError::validation("No signup awaiting verification"))?;

        let result = self
            .client
            .post(Endpoint::ResendOtp, &json!({"email": pending.email}))
            .await;

        self.cooldown.reset();

        match result {
            Ok(_) => {
                metrics::record_flow_outcome("otp_resend", "success");
                tracing::info!(email = %pending.email, "verification code resent");
                Ok(())
            }
            Err(err) => {
                metrics::record_flow_outcome("otp_resend", "failure");
                tracing::warn!(error = %err, "resend failed");
                Err(err)
            }
        }
    }
}
