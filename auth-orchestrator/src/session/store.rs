use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::models::{AuthScheme, SessionTokens, UserProfile};

/// Everything the tab holds once a flow has authenticated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSnapshot {
    /// Full Authorization header value, scheme prefix included.
    pub authorization: String,
    /// The raw credential, without its scheme prefix.
    pub access_token: String,
    pub scheme: AuthScheme,
    pub refresh_token: Option<String>,
    pub profile: Option<UserProfile>,
    /// Profile serialized once at establish time, for consumers that want
    /// the whole record as one value.
    pub profile_blob: Option<String>,
    pub established_utc: DateTime<Utc>,
}

/// Process-wide, tab-scoped holder of the active session.
///
/// A session exists here if and only if the user counts as authenticated;
/// flows write on success, logout clears, everything else only reads.
/// Consumers that need to react to sign-in/sign-out subscribe instead of
/// polling.
#[derive(Debug)]
pub struct SessionStore {
    state: RwLock<Option<SessionSnapshot>>,
    changes: watch::Sender<Option<SessionSnapshot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            state: RwLock::new(None),
            changes,
        }
    }

    /// Store the credential and profile for the rest of the tab's life.
    pub fn establish(&self, tokens: SessionTokens, profile: Option<UserProfile>) {
        let profile_blob = profile
            .as_ref()
            .and_then(|profile| serde_json::to_string(profile).ok());

        let snapshot = SessionSnapshot {
            authorization: tokens.scheme.header_value(&tokens.access_token),
            access_token: tokens.access_token,
            scheme: tokens.scheme,
            refresh_token: tokens.refresh_token,
            profile,
            profile_blob,
            established_utc: Utc::now(),
        };

        *self.state.write().expect("session lock poisoned") = Some(snapshot.clone());
        self.changes.send_replace(Some(snapshot));

        tracing::info!("session established");
    }

    pub fn current(&self) -> Option<SessionSnapshot> {
        self.state.read().expect("session lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    /// Drop every session key. Always succeeds, whatever the server said.
    pub fn clear(&self) {
        *self.state.write().expect("session lock poisoned") = None;
        self.changes.send_replace(None);

        tracing::info!("session cleared");
    }

    /// Observe establish/clear without polling.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionSnapshot>> {
        self.changes.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
