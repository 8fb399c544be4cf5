//! Backend connection configuration.
//!
//! `BackendConfig` mirrors `config.toml` in the botgen data directory. The
//! backend URL is normally supplied through `BACKEND_URL` instead.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Where the bot backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Timeout for the knowledge base and voice clone uploads.
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,

    /// Timeout for the bot creation call.
    #[serde(default = "default_create_timeout_secs")]
    pub create_timeout_secs: u64,
}

fn default_upload_timeout_secs() -> u64 {
    30
}

fn default_create_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            upload_timeout_secs: default_upload_timeout_secs(),
            create_timeout_secs: default_create_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    /// The configured base URL without trailing slashes.
    pub fn base_url(&self) -> Result<&str, ConfigError> {
        let url = self
            .backend_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingBackendUrl)?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(url.to_string()));
        }
        Ok(url)
    }
}
