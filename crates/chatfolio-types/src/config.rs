//! Server configuration types for chatfolio.
//!
//! `ServerConfig` represents the `config.toml` found in the data directory.
//! Every field has a documented default so a missing file is a valid setup;
//! command-line flags and environment variables override individual values.

use secrecy::SecretString;
use serde::Deserialize;

use crate::llm::CompletionMode;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// SQLite connection URL. Defaults to `chatfolio.db` inside the data directory.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub server: HttpConfig,

    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Listener and static asset settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

/// Chat-completion backend settings.
#[derive(Debug, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Usually supplied through `OPENAI_API_KEY` instead.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// How the page form path consumes the completion. The live channel
    /// always streams.
    #[serde(default)]
    pub page_mode: CompletionMode,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4-0125-preview".to_string()
}

fn default_temperature() -> f64 {
    0.2
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            page_mode: CompletionMode::default(),
        }
    }
}
