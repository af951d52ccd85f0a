//! BoxLlmProvider -- object-safe dynamic dispatch wrapper for LlmProvider.
//!
//! 1. Define an object-safe `LlmProviderDyn` trait with boxed futures
//! 2. Blanket-impl `LlmProviderDyn` for all `T: LlmProvider`
//! 3. `BoxLlmProvider` wraps `Box<dyn LlmProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use futures_util::Stream;

use chatfolio_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StreamEvent, TokenCount,
};

use super::provider::LlmProvider;

/// Object-safe version of [`LlmProvider`] with boxed futures.
pub trait LlmProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

    fn stream_boxed(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

    fn count_tokens_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TokenCount, LlmError>> + Send + 'a>>;
}

impl<T: LlmProvider> LlmProviderDyn for T {
    fn name(&self) -> &str {
        LlmProvider::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }

    fn stream_boxed(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.stream(request)
    }

    fn count_tokens_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TokenCount, LlmError>> + Send + 'a>> {
        Box::pin(self.count_tokens(request))
    }
}

/// Type-erased LLM provider for runtime provider selection.
///
/// Lets the process entry point choose the real backend while tests plug in
/// a scripted one, without making every service generic over the provider.
pub struct BoxLlmProvider {
    inner: Box<dyn LlmProviderDyn + Send + Sync>,
}

impl BoxLlmProvider {
    /// Wrap a concrete `LlmProvider` in a type-erased box.
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_boxed(request).await
    }

    pub fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.inner.stream_boxed(request)
    }

    pub async fn count_tokens(
        &self,
        request: &CompletionRequest,
    ) -> Result<TokenCount, LlmError> {
        self.inner.count_tokens_boxed(request).await
    }
}

impl std::fmt::Debug for BoxLlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxLlmProvider")
            .field("name", &self.inner.name())
            .finish()
    }
}
