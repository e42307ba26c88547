use std::sync::Arc;

use crate::services::{metrics, Endpoint, IdentityClient};
use crate::session::SessionStore;

use super::Navigation;

/// Session teardown.
///
/// The server-side revocation is best effort: its outcome is logged and
/// nothing more. Local sign-out must stay available when the identity
/// service is not, so the store is cleared unconditionally.
pub struct LogoutFlow {
    client: Arc<IdentityClient>,
    sessions: Arc<SessionStore>,
}

impl LogoutFlow {
    pub fn new(client: Arc<IdentityClient>, sessions: Arc<SessionStore>) -> Self {
        Self { client, sessions }
    }

    pub async fn sign_out(&self) -> Navigation {
        if let Some(session) = self.sessions.current() {
            match self
                .client
                .post_authorized(Endpoint::Logout, &session.access_token)
                .await
            {
                Ok(_) => tracing::info!("server session revoked"),
                Err(err) => {
                    tracing::warn!(error = %err, "server logout failed; clearing local session anyway")
                }
            }
        }

        self.sessions.clear();
        metrics::record_flow_outcome("logout", "success");
        Navigation::SignIn
    }
}
