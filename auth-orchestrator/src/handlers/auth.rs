use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use platform_core::error::FlowError;
use secrecy::Secret;
use serde::Deserialize;

use crate::flows::otp::OTP_LENGTH;
use crate::flows::{CallbackQuery, Navigation};
use crate::models::{Credentials, LinkCredentials, RegistrationProfile};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub password: Secret<String>,
    pub confirm_password: Secret<String>,
}

#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub new_password: Secret<String>,
    pub confirm_password: Secret<String>,
}

pub async fn signup_handler(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, FlowError> {
    let profile = RegistrationProfile {
        email: form.email,
        name: form.name,
        description: form.description,
        password: form.password,
    };

    let signal = state.registration.submit(profile, &form.confirm_password).await?;

    if signal == Navigation::VerifyOtp {
        state.begin_otp_challenge().await;
    }

    Ok(navigate(signal))
}

pub async fn verify_otp_page(State(state): State<AppState>) -> Response {
    let slot = state.otp.lock().await;
    match slot.as_ref() {
        Some(challenge) => (
            StatusCode::OK,
            format!(
                "Enter the code sent to your email. Resend available in {}s.",
                challenge.cooldown_remaining()
            ),
        )
            .into_response(),
        None => Redirect::to("/signup").into_response(),
    }
}

pub async fn verify_otp_handler(
    State(state): State<AppState>,
    Form(form): Form<OtpForm>,
) -> Result<Response, FlowError> {
    let mut slot = state.otp.lock().await;
    let challenge = slot
        .as_mut()
        .ok_or_else(|| FlowError::validation("No verification in progress"))?;

    for (index, digit) in form.otp.chars().take(OTP_LENGTH).enumerate() {
        challenge.enter_digit(index, digit);
    }

    // On failure the `?` leaves the challenge in place, cells still editable.
    let signal = challenge.submit().await?;

    // Verified: the step is over, and the cooldown timer goes with it.
    *slot = None;

    Ok(navigate(signal))
}

pub async fn resend_otp_handler(State(state): State<AppState>) -> Result<Response, FlowError> {
    let mut slot = state.otp.lock().await;
    let challenge = slot
        .as_mut()
        .ok_or_else(|| FlowError::validation("No verification in progress"))?;

    challenge.resend().await?;

    Ok((StatusCode::OK, "Verification code resent").into_response())
}

pub async fn signin_handler(
    State(state): State<AppState>,
    Form(form): Form<SigninForm>,
) -> Result<Response, FlowError> {
    let credentials = Credentials {
        email: form.email,
        password: form.password,
    };

    let signal = state.login.submit(credentials).await?;

    // Signing in abandons any half-finished verification step.
    state.end_otp_challenge().await;

    Ok(navigate(signal))
}

pub async fn signout_handler(State(state): State<AppState>) -> Response {
    state.end_otp_challenge().await;
    let signal = state.logout.sign_out().await;
    navigate(signal)
}

pub async fn google_oauth_redirect(State(state): State<AppState>) -> Result<Response, FlowError> {
    let signal = state.oauth.initiate().await?;
    Ok(navigate(signal))
}

pub async fn google_oauth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let signal = state.oauth.callback(query).await;
    navigate(signal)
}

pub async fn forgot_password_handler(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Response, FlowError> {
    let signal = state.reset.request(&form.email).await?;
    Ok(navigate(signal))
}

pub async fn reset_password_handler(
    State(state): State<AppState>,
    Path((uid, token)): Path<(String, String)>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, FlowError> {
    let signal = state
        .reset
        .confirm(
            LinkCredentials { uid, token },
            &form.new_password,
            &form.confirm_password,
        )
        .await?;
    Ok(navigate(signal))
}

pub async fn activate_handler(
    State(state): State<AppState>,
    Path((uid, token)): Path<(String, String)>,
) -> Result<Response, FlowError> {
    let detail = state
        .registration
        .activate(LinkCredentials { uid, token })
        .await?;
    Ok((StatusCode::OK, detail).into_response())
}

/// Map a flow's navigation signal onto the wire.
fn navigate(signal: Navigation) -> Response {
    match signal {
        Navigation::VerifyOtp => Redirect::to("/verify-otp").into_response(),
        Navigation::Dashboard => Redirect::to("/dashboard").into_response(),
        Navigation::SignIn => Redirect::to("/signin").into_response(),
        Navigation::SignInAfter(delay) => {
            // Browser-native delayed redirect: the confirmation stays up
            // until the refresh fires.
            let mut headers = HeaderMap::new();
            if let Ok(value) = format!("{};url=/signin", delay.as_secs()).parse() {
                headers.insert("refresh", value);
            }
            (
                StatusCode::OK,
                headers,
                "Password updated. Redirecting to sign-in.",
            )
                .into_response()
        }
        Navigation::External(url) => Redirect::to(&url).into_response(),
        Navigation::ResetEmailSent => {
            (StatusCode::OK, "Check your email for the reset link.").into_response()
        }
    }
}
