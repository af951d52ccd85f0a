//! LlmProvider trait definition.
//!
//! This is the core abstraction that chat-completion backends implement.
//! Uses RPITIT for `complete` and `count_tokens`, and `Pin<Box<dyn Stream>>`
//! for `stream` (streams need to be object-safe for the BoxLlmProvider wrapper).

use std::pin::Pin;

use futures_util::Stream;

use chatfolio_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StreamEvent, TokenCount,
};

/// Trait for chat-completion backends.
///
/// Implementations live in chatfolio-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a non-streamed completion request and receive the full message.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

    /// Count the tokens in a request without sending it to the LLM.
    fn count_tokens(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<TokenCount, LlmError>> + Send;
}
