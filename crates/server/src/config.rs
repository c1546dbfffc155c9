use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Identity headers injected by the fronting platform plus the login/logout
/// links it exposes. The service itself never manages sessions.
#[derive(Clone, Debug, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_user_header")]
    pub user_header: String,
    #[serde(default = "default_admin_header")]
    pub admin_header: String,
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_logout_url")]
    pub logout_url: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_header: default_user_header(),
            admin_header: default_admin_header(),
            login_url: default_login_url(),
            logout_url: default_logout_url(),
        }
    }
}

/// OAuth 1.0a consumer settings for the profile-linking handshake.
///
/// When `provider_base` is unset, the provider endpoints are derived from the
/// incoming request's `Host` header (`https://{host}/_ah/...`), matching the
/// hosted-platform deployment. Setting it pins the provider explicitly,
/// which is also how the integration tests point the handshake at a mock.
#[derive(Clone, Debug, Deserialize)]
pub struct OAuthConfig {
    #[serde(default = "default_consumer_key")]
    pub consumer_key: String,
    #[serde(default = "default_consumer_key")]
    pub consumer_secret: String,
    #[serde(default)]
    pub provider_base: Option<String>,
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            consumer_key: default_consumer_key(),
            consumer_secret: default_consumer_key(),
            provider_base: None,
            callback_path: default_callback_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub oauth: OAuthConfig,
}

fn default_user_header() -> String {
    "x-status-user".to_string()
}

fn default_admin_header() -> String {
    "x-status-admin".to_string()
}

fn default_login_url() -> String {
    "/_ah/login".to_string()
}

fn default_logout_url() -> String {
    "/_ah/logout".to_string()
}

fn default_consumer_key() -> String {
    "anonymous".to_string()
}

fn default_callback_path() -> String {
    "/profile/verify".to_string()
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variables matching the key path separated by double
/// underscores (e.g. `OAUTH__CONSUMER_KEY`) override file values.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how
/// to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;

    if app.database_url.is_empty() {
        return Err(ConfigError::Validation("database_url must be set".into()));
    }
    if app.oauth.consumer_key.is_empty() {
        return Err(ConfigError::Validation(
            "oauth.consumer_key must not be empty".into(),
        ));
    }
    if !app.oauth.callback_path.starts_with('/') {
        return Err(ConfigError::Validation(
            "oauth.callback_path must be an absolute path".into(),
        ));
    }

    Ok(app)
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}
