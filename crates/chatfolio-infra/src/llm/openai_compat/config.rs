//! Connection settings for an OpenAI-compatible chat-completions endpoint.

use secrecy::SecretString;

use chatfolio_types::config::CompletionConfig;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`]. Deliberately not
/// `Clone`, and its `Debug` output redacts the key via [`SecretString`].
#[derive(Debug)]
pub struct OpenAiCompatConfig {
    /// Human-readable provider name used in logs.
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key. When absent the client falls back to `OPENAI_API_KEY`.
    pub api_key: Option<SecretString>,
    /// Model used when a request leaves its model empty.
    pub model: String,
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
pub fn openai_defaults(api_key: Option<SecretString>, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
    }
}

impl OpenAiCompatConfig {
    /// Build provider settings from the `[completion]` section of `config.toml`.
    ///
    /// A base URL other than OpenAI's names the provider "openai_compat" so
    /// logs distinguish proxies and self-hosted endpoints.
    pub fn from_completion(config: &CompletionConfig) -> Self {
        let mut resolved = openai_defaults(config.api_key.clone(), &config.model);
        if config.base_url.trim_end_matches('/') != resolved.base_url {
            resolved.provider_name = "openai_compat".into();
            resolved.base_url = config.base_url.clone();
        }
        resolved
    }
}
