//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The client secret is loaded from NIGHTBOT_CLIENT_SECRET or
//! client_secret_file, never stored in the TOML directly.

use common::Secret;
use nightbot_auth::{API_BASE_URL, ClientInfo};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
}

/// Registered app identity
#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(skip)]
    pub client_secret: Option<Secret<String>>,
    /// Path to a file containing the client secret (alternative to NIGHTBOT_CLIENT_SECRET)
    #[serde(default)]
    pub client_secret_file: Option<PathBuf>,
}

/// API endpoint settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Where the token pair is persisted
#[derive(Debug, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_path")]
    pub path: PathBuf,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            path: default_token_path(),
        }
    }
}

fn default_base_url() -> String {
    API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_token_path() -> PathBuf {
    PathBuf::from("nightbot-tokens.json")
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// Client secret resolution order:
    /// 1. NIGHTBOT_CLIENT_SECRET env var
    /// 2. client_secret_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if config.client.client_id.trim().is_empty() {
            return Err(common::Error::Config("client_id must not be empty".into()));
        }

        if !config.api.base_url.starts_with("http://")
            && !config.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                config.api.base_url
            )));
        }

        if config.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        // Env var takes precedence over file
        if let Ok(secret) = std::env::var("NIGHTBOT_CLIENT_SECRET") {
            config.client.client_secret = Some(Secret::new(secret));
        } else if let Some(ref secret_file) = config.client.client_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read client_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim().to_owned();
            if !secret.is_empty() {
                config.client.client_secret = Some(Secret::new(secret));
            }
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or NIGHTBOT_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("NIGHTBOT_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("nightbot.toml")
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.timeout_secs)
    }

    /// App identity for the SDK. Fails when no client secret was configured.
    pub fn client_info(&self) -> common::Result<ClientInfo> {
        let secret = self.client.client_secret.as_ref().ok_or_else(|| {
            common::Error::Config(
                "client secret missing: set NIGHTBOT_CLIENT_SECRET or client_secret_file".into(),
            )
        })?;
        Ok(ClientInfo {
            client_id: self.client.client_id.clone(),
            client_secret: secret.clone(),
            redirect_uri: self.client.redirect_uri.clone(),
        })
    }
}
