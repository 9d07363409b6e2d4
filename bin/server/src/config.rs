//! Centralized server configuration.
//!
//! Strongly-typed configuration for the gateway, loaded via the `config`
//! crate from environment variables.
//!
//! See [`ProviderConfig`](fleet_console_access::ProviderConfig) for the
//! identity provider settings.

use fleet_console_access::{AdminCredentials, ProviderConfig};
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the gateway listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// Federated identity provider configuration.
    pub provider: ProviderConfig,

    /// Local administrator credential.
    pub admin: AdminCredentials,

    /// Extra public-path prefixes beyond the compiled-in set.
    #[serde(default)]
    pub public_paths: Vec<String>,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session duration in minutes.
    #[serde(default = "default_session_duration_minutes")]
    pub duration_minutes: i64,

    /// Interval between expired-session sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP
    /// development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_session_duration_minutes() -> i64 {
    60
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_session_duration_minutes(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_has_correct_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.duration_minutes, 60);
        assert_eq!(config.cleanup_interval_seconds, 300);
        assert!(config.secure_cookies);
    }

    #[test]
    fn server_config_deserializes_with_defaults() {
        let json = r#"{
            "provider": {
                "auth_url": "https://idp.example.com/authorize",
                "token_url": "https://idp.example.com/oauth/token",
                "userinfo_url": "https://idp.example.com/userinfo",
                "client_id": "client",
                "client_secret": "secret",
                "redirect_uri": "https://console.example.com/auth/login/callback"
            },
            "admin": {"username": "ops", "password": "s3cret"}
        }"#;

        let config: ServerConfig = serde_json::from_str(json).expect("deserialize");
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert_eq!(config.session.duration_minutes, 60);
        assert!(config.public_paths.is_empty());
    }
}
