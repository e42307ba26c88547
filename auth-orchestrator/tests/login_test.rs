mod common;

use secrecy::Secret;
use serde_json::json;

use auth_orchestrator::flows::Navigation;
use auth_orchestrator::models::{AuthScheme, Credentials};
use common::TestApp;
use platform_core::error::FlowError;

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: Secret::new(password.to_string()),
    }
}

#[tokio::test]
async fn successful_login_establishes_the_expected_session() {
    let app = TestApp::spawn().await;
    app.stub.state.respond(
        "POST",
        "/auth/login",
        200,
        json!({
            "token": "T1",
            "user": {"id": 7, "email": "a@b.com", "name": "A"},
        }),
    );

    let signal = app
        .state
        .login
        .submit(credentials("a@b.com", "Passw0rd!"))
        .await
        .expect("login accepted");

    assert_eq!(signal, Navigation::Dashboard);

    let requests = app.stub.state.requests_to("POST", "/auth/login");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body["email"], "a@b.com");
    assert_eq!(requests[0].body["password"], "Passw0rd!");

    let snapshot = app.state.sessions.current().expect("session established");
    assert_eq!(snapshot.authorization, "Bearer T1");
    assert_eq!(snapshot.access_token, "T1");
    assert_eq!(snapshot.scheme, AuthScheme::Bearer);

    let profile = snapshot.profile.expect("profile stored");
    assert_eq!(profile.id, 7);
    assert_eq!(profile.email, "a@b.com");
    assert_eq!(profile.name, "A");
}

#[tokio::test]
async fn rejected_login_surfaces_the_message_and_leaves_no_session() {
    let app = TestApp::spawn().await;
    app.stub.state.respond(
        "POST",
        "/auth/login",
        401,
        json!({"error": "Invalid email or password"}),
    );

    let result = app
        .state
        .login
        .submit(credentials("a@b.com", "wrong"))
        .await;

    match result {
        Err(FlowError::Server { message }) => assert_eq!(message, "Invalid email or password"),
        other => panic!("expected a server rejection, got {:?}", other),
    }

    assert!(app.state.sessions.current().is_none());
    // No automatic retry: the user resubmitting is the retry mechanism.
    assert_eq!(app.stub.state.calls_to("POST", "/auth/login"), 1);
}

#[tokio::test]
async fn login_applies_no_password_strength_policy() {
    let app = TestApp::spawn().await;
    app.stub.state.respond(
        "POST",
        "/auth/login",
        200,
        json!({"token": "T2", "user": {"id": 1, "email": "a@b.com", "name": "A"}}),
    );

    // "x" would fail every signup rule; login sends it anyway.
    app.state
        .login
        .submit(credentials("a@b.com", "x"))
        .await
        .expect("login accepted");

    assert_eq!(app.stub.state.calls_to("POST", "/auth/login"), 1);
}

#[tokio::test]
async fn malformed_success_payload_is_a_transport_failure() {
    let app = TestApp::spawn().await;
    app.stub
        .state
        .respond("POST", "/auth/login", 200, json!({"unexpected": true}));

    let result = app
        .state
        .login
        .submit(credentials("a@b.com", "Passw0rd!"))
        .await;

    assert!(matches!(result, Err(FlowError::Transport(_))));
    assert!(app.state.sessions.current().is_none());
}

#[tokio::test]
async fn unreachable_service_is_a_transport_failure() {
    let state = common::unreachable_state();

    let result = state.login.submit(credentials("a@b.com", "Passw0rd!")).await;

    match result {
        Err(FlowError::Transport(message)) => {
            assert_eq!(message, "Something went wrong. Please try again.")
        }
        other => panic!("expected a transport failure, got {:?}", other),
    }
    assert!(state.sessions.current().is_none());
}
