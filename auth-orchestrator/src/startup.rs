use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use platform_core::middleware::tracing::request_id_middleware;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    app::{health_check, index, signin_page, signup_page},
    auth::{
        activate_handler, forgot_password_handler, google_oauth_callback, google_oauth_redirect,
        resend_otp_handler, reset_password_handler, signin_handler, signout_handler,
        signup_handler, verify_otp_handler, verify_otp_page,
    },
    metrics::metrics,
    user::dashboard_handler,
};
use crate::middleware::auth::{redirect_authenticated, require_session};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Sign-in/sign-up are public-auth-only: an established session skips
    // them entirely.
    let public_only = Router::new()
        .route("/signin", get(signin_page).post(signin_handler))
        .route("/signup", get(signup_page).post(signup_handler))
        .route_layer(from_fn_with_state(state.clone(), redirect_authenticated));

    let protected = Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/verify-otp", get(verify_otp_page).post(verify_otp_handler))
        .route("/verify-otp/resend", post(resend_otp_handler))
        .route("/signout", post(signout_handler))
        .route("/auth/google", get(google_oauth_redirect))
        .route("/auth/google/callback", get(google_oauth_callback))
        .route("/password/forgot", post(forgot_password_handler))
        .route("/password/reset/:uid/:token", post(reset_password_handler))
        .route("/activate/:uid/:token", post(activate_handler))
        .merge(public_only)
        .merge(protected)
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
