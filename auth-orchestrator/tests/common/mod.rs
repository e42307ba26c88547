//! Test helpers: a scripted stand-in for the identity service plus the
//! application state wired against it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use auth_orchestrator::config::{IdentityServiceSettings, ServerSettings, Settings};
use auth_orchestrator::AppState;

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
struct ScriptedResponse {
    status: u16,
    body: Value,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<HashMap<String, ScriptedResponse>>,
}

impl StubState {
    /// Script the response for `METHOD path`; unscripted routes answer 200.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.responses.lock().unwrap().insert(
            format!("{} {}", method, path),
            ScriptedResponse {
                status,
                body,
                delay: None,
            },
        );
    }

    /// Script a response that is held back for `delay` before answering.
    pub fn respond_delayed(&self, method: &str, path: &str, status: u16, body: Value, delay: Duration) {
        self.responses.lock().unwrap().insert(
            format!("{} {}", method, path),
            ScriptedResponse {
                status,
                body,
                delay: Some(delay),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.path == path)
            .collect()
    }

    pub fn calls_to(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }
}

async fn record(State(state): State<Arc<StubState>>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();
    let query = parts
        .uri
        .query()
        .map(parse_query)
        .unwrap_or_default();
    let authorization = parts
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query,
        authorization,
        body,
    });

    let scripted = state
        .responses
        .lock()
        .unwrap()
        .get(&format!("{} {}", method, path))
        .cloned();

    match scripted {
        Some(response) => {
            if let Some(delay) = response.delay {
                tokio::time::sleep(delay).await;
            }
            let status =
                StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let payload = if response.body.is_null() {
                String::new()
            } else {
                response.body.to_string()
            };
            (status, payload).into_response()
        }
        None => StatusCode::OK.into_response(),
    }
}

/// Scripted identity service bound to a random local port.
pub struct StubIdentityService {
    pub base_url: String,
    pub state: Arc<StubState>,
}

impl StubIdentityService {
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("listener has an address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }
}

/// The orchestrator wired against a fresh stub.
pub struct TestApp {
    pub stub: StubIdentityService,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_timeout(30).await
    }

    /// Spawn with a specific transport timeout.
    pub async fn spawn_with_timeout(request_timeout_seconds: u64) -> Self {
        let stub = StubIdentityService::spawn().await;
        let settings = test_settings(&stub.base_url, request_timeout_seconds);
        let state = AppState::new(settings).expect("Failed to build app state");

        Self { stub, state }
    }
}

pub fn test_settings(identity_url: &str, request_timeout_seconds: u64) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        identity_service: IdentityServiceSettings {
            url: identity_url.to_string(),
            oauth_redirect_uri: "http://localhost:9010/auth/google/callback".to_string(),
            request_timeout_seconds,
        },
    }
}

/// State pointed at a port nothing listens on, for transport-failure paths.
pub fn unreachable_state() -> AppState {
    AppState::new(test_settings("http://127.0.0.1:9", 1)).expect("Failed to build app state")
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (percent_decode(key), percent_decode(value)),
            None => (percent_decode(pair), String::new()),
        })
        .collect()
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match u8::from_str_radix(&input[i + 1..i + 3], 16) {
                    Ok(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    Err(_) => {
                        out.push(bytes[i]);
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
