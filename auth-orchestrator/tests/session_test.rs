mod common;

use serde_json::json;

use auth_orchestrator::flows::Navigation;
use auth_orchestrator::models::{SessionTokens, UserProfile};
use common::TestApp;

fn profile() -> UserProfile {
    UserProfile {
        id: 7,
        name: "A".to_string(),
        email: "a@b.com".to_string(),
        description: String::new(),
    }
}

#[tokio::test]
async fn logout_revokes_with_the_token_scheme_then_clears() {
    let app = TestApp::spawn().await;
    app.stub
        .state
        .respond("POST", "/auth/token/logout", 204, json!(null));

    app.state
        .sessions
        .establish(SessionTokens::bearer("T9"), Some(profile()));

    let signal = app.state.logout.sign_out().await;
    assert_eq!(signal, Navigation::SignIn);

    // The stored credential is "Bearer ...", but the logout endpoint lives in
    // the token subsystem and gets its own header form.
    let requests = app.stub.state.requests_to("POST", "/auth/token/logout");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Token T9"));

    assert!(app.state.sessions.current().is_none());
}

#[tokio::test]
async fn logout_clears_the_session_even_when_the_server_fails() {
    let app = TestApp::spawn().await;
    app.stub.state.respond(
        "POST",
        "/auth/token/logout",
        500,
        json!({"error": "revocation unavailable"}),
    );

    app.state
        .sessions
        .establish(SessionTokens::bearer("T9"), Some(profile()));

    let signal = app.state.logout.sign_out().await;

    assert_eq!(signal, Navigation::SignIn);
    assert!(app.state.sessions.current().is_none());
}

#[tokio::test]
async fn logout_clears_the_session_when_the_server_is_unreachable() {
    let state = common::unreachable_state();

    state
        .sessions
        .establish(SessionTokens::bearer("T9"), Some(profile()));

    let signal = state.logout.sign_out().await;

    assert_eq!(signal, Navigation::SignIn);
    assert!(state.sessions.current().is_none());
}

#[tokio::test]
async fn logout_without_a_session_skips_the_revocation_call() {
    let app = TestApp::spawn().await;

    let signal = app.state.logout.sign_out().await;

    assert_eq!(signal, Navigation::SignIn);
    assert_eq!(app.stub.state.calls_to("POST", "/auth/token/logout"), 0);
}

#[tokio::test]
async fn subscribers_follow_the_session_through_login_and_logout() {
    let app = TestApp::spawn().await;
    app.stub.state.respond(
        "POST",
        "/auth/login",
        200,
        json!({"token": "T1", "user": {"id": 7, "email": "a@b.com", "name": "A"}}),
    );
    app.stub
        .state
        .respond("POST", "/auth/token/logout", 204, json!(null));

    let mut changes = app.state.sessions.subscribe();
    assert!(changes.borrow().is_none());

    app.state
        .login
        .submit(auth_orchestrator::models::Credentials {
            email: "a@b.com".to_string(),
            password: secrecy::Secret::new("Passw0rd!".to_string()),
        })
        .await
        .expect("login accepted");

    changes.changed().await.expect("store alive");
    assert!(changes.borrow_and_update().is_some());

    app.state.logout.sign_out().await;

    changes.changed().await.expect("store alive");
    assert!(changes.borrow().is_none());
}
