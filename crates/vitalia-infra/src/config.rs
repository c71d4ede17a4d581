//! Server configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.vitalia/` in production)
//! and deserializes it into [`ServerConfig`]. Falls back to defaults when the
//! file is missing or malformed. The JWT secret can always be overridden via
//! the `VITALIA_JWT_SECRET` environment variable, which wins over the file.

use std::path::{Path, PathBuf};

use vitalia_types::config::ServerConfig;

/// Resolve the data directory: `VITALIA_DATA_DIR` if set, else `~/.vitalia`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VITALIA_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vitalia")
}

/// Load server configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ServerConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - `VITALIA_JWT_SECRET`, when set and non-empty, overrides the signing secret.
pub async fn load_server_config(data_dir: &Path) -> ServerConfig {
    let config_path = data_dir.join("config.toml");

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<ServerConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                ServerConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            ServerConfig::default()
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            ServerConfig::default()
        }
    };

    if let Ok(secret) = std::env::var("VITALIA_JWT_SECRET") {
        if !secret.is_empty() {
            config.auth.jwt_secret = secret;
        }
    }

    config
}
