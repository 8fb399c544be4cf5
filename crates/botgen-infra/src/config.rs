//! Configuration loader for botgen.
//!
//! Reads `config.toml` from the data directory (`~/.botgen/` by default) and
//! deserializes it into [`BackendConfig`]. Falls back to defaults when the
//! file is missing or malformed. The backend URL given on the command line or
//! through `BACKEND_URL` wins over the file.

use std::path::{Path, PathBuf};

use botgen_types::config::BackendConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BOTGEN_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `BOTGEN_DATA_DIR` environment variable
/// 2. `~/.botgen`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".botgen");
    }

    // Last resort: current directory
    PathBuf::from(".botgen")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`BackendConfig::default()`].
/// - If the file cannot be read or fails to parse, logs a warning and returns
///   the default.
pub async fn load_backend_config(data_dir: &Path) -> BackendConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return BackendConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return BackendConfig::default();
        }
    };

    match toml::from_str::<BackendConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BackendConfig::default()
        }
    }
}

/// Load the config file and apply a backend URL override (flag or env).
pub async fn resolve_backend_config(
    data_dir: &Path,
    backend_url: Option<String>,
) -> BackendConfig {
    let mut config = load_backend_config(data_dir).await;
    if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
        config.backend_url = Some(url);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_backend_config(tmp.path()).await;
        assert_eq!(config, BackendConfig::default());
    }

    #[tokio::test]
    async fn load_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
backend_url = "http://bots.internal:8000"
create_timeout_secs = 120
"#,
        )
        .await
        .unwrap();

        let config = load_backend_config(tmp.path()).await;
        assert_eq!(config.backend_url.as_deref(), Some("http://bots.internal:8000"));
        assert_eq!(config.upload_timeout_secs, 30);
        assert_eq!(config.create_timeout_secs, 120);
    }

    #[tokio::test]
    async fn load_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "backend_url = [not valid")
            .await
            .unwrap();

        let config = load_backend_config(tmp.path()).await;
        assert_eq!(config, BackendConfig::default());
    }

    #[tokio::test]
    async fn load_unreadable_config_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::create_dir(tmp.path().join("config.toml")).await.unwrap();

        let config = load_backend_config(tmp.path()).await;
        assert_eq!(config, BackendConfig::default());
    }

    #[tokio::test]
    async fn override_wins_over_file() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"backend_url = "http://from-file""#,
        )
        .await
        .unwrap();

        let config =
            resolve_backend_config(tmp.path(), Some("http://from-env".to_string())).await;
        assert_eq!(config.backend_url.as_deref(), Some("http://from-env"));

        let config = resolve_backend_config(tmp.path(), Some(String::new())).await;
        assert_eq!(config.backend_url.as_deref(), Some("http://from-file"));
    }

    #[test]
    fn resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-botgen");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-botgen"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
