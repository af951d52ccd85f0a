//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `chatfolio-core`, plus a factory ([`create_provider`])
//! that builds it from the `[completion]` configuration section and a
//! connection check ([`test_provider_connection`]).
//!
//! [`LlmProvider`]: chatfolio_core::llm::provider::LlmProvider

pub mod openai_compat;

use chatfolio_core::llm::box_provider::BoxLlmProvider;
use chatfolio_types::config::CompletionConfig;
use chatfolio_types::llm::{CompletionRequest, LlmError, Message};

use self::openai_compat::config::OpenAiCompatConfig;
use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the completion configuration.
///
/// A missing API key is not an error here: the client falls back to
/// `OPENAI_API_KEY`, and a request without any key fails with
/// [`LlmError::AuthenticationFailed`] at call time.
pub fn create_provider(config: &CompletionConfig) -> BoxLlmProvider {
    if config.api_key.is_none() {
        tracing::warn!("No completion API key configured; relying on OPENAI_API_KEY");
    }
    let provider = OpenAiCompatibleProvider::new(OpenAiCompatConfig::from_completion(config));
    BoxLlmProvider::new(provider)
}

/// Test provider connectivity by sending a minimal completion request.
///
/// Sends a tiny "Hello" message with a small token budget.
pub async fn test_provider_connection(
    provider: &BoxLlmProvider,
    model: &str,
) -> Result<(), LlmError> {
    let request = CompletionRequest {
        model: model.to_string(),
        messages: vec![Message::user("Hello")],
        temperature: Some(0.0),
        max_tokens: Some(10),
        stream: false,
    };
    provider.complete(&request).await?;
    Ok(())
}
