use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::AppState;

/// The one gate in front of protected views: no session, no entry.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if !state.sessions.is_authenticated() {
        return Ok(Redirect::to("/signin").into_response());
    }

    Ok(next.run(request).await)
}

/// Gate for public-auth-only views: already signed in goes straight to the
/// dashboard instead of seeing sign-in/sign-up again.
pub async fn redirect_authenticated(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if state.sessions.is_authenticated() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(next.run(request).await)
}
