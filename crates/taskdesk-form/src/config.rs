/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed client and session configuration
[POS]:    Configuration layer - API endpoint and credentials
[UPDATE]: When adding new configuration options
*/

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskdesk_client::http::client::DEFAULT_BASE_URL;
use taskdesk_client::{ClientConfig, SessionManager, SessionToken};

/// Top-level configuration for the taskdesk CLI
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskdeskConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Task API endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API root, e.g. "http://localhost:5000/api"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Session credential issued by the backend's login flow
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub token: Option<String>,
    /// Seconds until the token should be treated as expired
    #[serde(default)]
    pub expires_in_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl TaskdeskConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// `<config dir>/taskdesk/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskdesk").join("config.yaml"))
    }

    /// Load an explicit file, else the default file if present, else defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path)
                .with_context(|| format!("read config {}", path.display()));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)
                .with_context(|| format!("read config {}", path.display())),
            _ => Ok(Self::default()),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.api.timeout_secs),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_secs),
        }
    }

    /// Session manager seeded with the configured token, if any
    pub fn session_manager(&self) -> SessionManager {
        let manager = SessionManager::new();
        if let Some(token) = &self.session.token {
            manager.set_token(SessionToken::new(token.clone()), self.session.expires_in_secs);
        }
        manager
    }
}
