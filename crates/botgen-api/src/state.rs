//! Application state: resolved configuration and backend wiring.

use std::path::PathBuf;

use botgen_infra::config::{resolve_backend_config, resolve_data_dir};
use botgen_infra::http::HttpBotBackend;
use botgen_types::config::BackendConfig;

/// Configuration shared by every command.
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: BackendConfig,
}

impl AppState {
    /// Resolve the data directory and backend configuration.
    ///
    /// `backend_url` comes from `--backend-url` or `BACKEND_URL` and takes
    /// precedence over `config.toml`.
    pub async fn init(backend_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = resolve_backend_config(&data_dir, backend_url).await;
        tracing::debug!(data_dir = %data_dir.display(), ?config, "Resolved configuration");

        Ok(Self { data_dir, config })
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// Build the HTTP backend. Fails when no backend URL is configured.
    pub fn backend(&self) -> anyhow::Result<HttpBotBackend> {
        Ok(HttpBotBackend::new(&self.config)?)
    }
}
