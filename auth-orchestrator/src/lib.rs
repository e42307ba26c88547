pub mod config;
pub mod flows;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod startup;
pub mod utils;

use std::sync::Arc;

use tokio::sync::Mutex;

use config::Settings;
use flows::{
    CredentialLoginFlow, FederatedLoginFlow, LogoutFlow, OtpChallenge, PasswordResetFlow,
    RegistrationFlow,
};
use services::IdentityClient;
use session::{SessionStore, SignupHandoff};

/// Shared application state wiring the flows to their collaborators.
///
/// `SessionStore` is written only by whichever flow completes
/// authentication, and by logout; everything else reads.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub identity: Arc<IdentityClient>,
    pub sessions: Arc<SessionStore>,
    pub handoff: Arc<SignupHandoff>,
    pub registration: Arc<RegistrationFlow>,
    pub login: Arc<CredentialLoginFlow>,
    pub logout: Arc<LogoutFlow>,
    pub oauth: Arc<FederatedLoginFlow>,
    pub reset: Arc<PasswordResetFlow>,
    /// The live OTP challenge; present exactly while the verification step is.
    pub otp: Arc<Mutex<Option<OtpChallenge>>>,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let identity = Arc::new(IdentityClient::new(settings.identity_service.clone())?);
        let sessions = Arc::new(SessionStore::new());
        let handoff = Arc::new(SignupHandoff::new());

        Ok(Self {
            registration: Arc::new(RegistrationFlow::new(identity.clone(), handoff.clone())),
            login: Arc::new(CredentialLoginFlow::new(identity.clone(), sessions.clone())),
            logout: Arc::new(LogoutFlow::new(identity.clone(), sessions.clone())),
            oauth: Arc::new(FederatedLoginFlow::new(
                identity.clone(),
                sessions.clone(),
                settings.identity_service.oauth_redirect_uri.clone(),
            )),
            reset: Arc::new(PasswordResetFlow::new(identity.clone())),
            otp: Arc::new(Mutex::new(None)),
            settings,
            identity,
            sessions,
            handoff,
        })
    }

    /// Enter the verification step. Replacing the slot drops any previous
    /// challenge, cooldown timer included.
    pub async fn begin_otp_challenge(&self) {
        let challenge = OtpChallenge::begin(
            self.identity.clone(),
            self.sessions.clone(),
            self.handoff.clone(),
        );
        *self.otp.lock().await = Some(challenge);
    }

    /// Leave the verification step, tearing its timer down with it.
    pub async fn end_otp_challenge(&self) {
        *self.otp.lock().await = None;
    }
}
