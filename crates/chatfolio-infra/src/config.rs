//! Server configuration loader for chatfolio.
//!
//! Reads `config.toml` from the data directory (`~/.chatfolio/` in production)
//! and deserializes it into [`ServerConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::{Path, PathBuf};

use chatfolio_types::config::ServerConfig;

use crate::sqlite::pool::default_database_url;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load server configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ServerConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_server_config(data_dir: &Path) -> ServerConfig {
    let config_path = data_dir.join(CONFIG_FILE);

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ServerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ServerConfig::default();
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServerConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Uses `CHATFOLIO_DATA_DIR` if set, otherwise `~/.chatfolio`, otherwise
/// `./.chatfolio`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATFOLIO_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatfolio");
    }

    PathBuf::from(".chatfolio")
}

/// The database URL to open: the configured one, or the data-directory default.
pub fn resolve_database_url(config: &ServerConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir))
}
