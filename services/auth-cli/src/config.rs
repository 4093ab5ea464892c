//! Configuration types and loading
//!
//! Config precedence: env vars > config file > defaults. `AUTH0_DOMAIN` and
//! `AUTH0_CLIENT_ID` override the `[auth0]` table so the same file can be
//! pointed at different tenants.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use web_auth::AuthProperties;

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub auth0: AuthProperties,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the session keys are persisted
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("auth-session.json")
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if let Ok(domain) = std::env::var("AUTH0_DOMAIN") {
            config.auth0.domain = domain;
        }
        if let Ok(client_id) = std::env::var("AUTH0_CLIENT_ID") {
            config.auth0.client_id = client_id;
        }

        // Fail at load time rather than on first use
        config
            .auth0
            .resolve()
            .map_err(|e| common::Error::Config(format!("auth0: {e}")))?;

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("auth-session.toml")
    }
}
