use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub identity_service: IdentityServiceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IdentityServiceSettings {
    /// Base URL of the identity service.
    pub url: String,
    /// Callback route the OAuth provider sends the browser back to; passed
    /// verbatim on both the authorize and exchange phases.
    pub oauth_redirect_uri: String,
    /// Transport-level timeout for every identity call.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Check if we're already in auth-orchestrator directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("auth-orchestrator") {
        base_path.join("config")
    } else {
        base_path.join("auth-orchestrator").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
