//! Test fixtures: a scripted completion provider and a state over a temp database.

use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futures_util::Stream;

use chatfolio_core::llm::box_provider::BoxLlmProvider;
use chatfolio_core::llm::provider::LlmProvider;
use chatfolio_core::llm::tokens::estimate_tokens;
use chatfolio_infra::sqlite::pool::{default_database_url, DatabasePool};
use chatfolio_types::config::ServerConfig;
use chatfolio_types::llm::{
    CompletionMode, CompletionRequest, CompletionResponse, LlmError, StopReason, StreamEvent,
    TokenCount, Usage,
};

use crate::state::AppState;

/// Answers every request with a fixed reply, or fails every request.
pub struct MockProvider {
    reply: Option<String>,
    calls: Arc<Mutex<u32>>,
}

impl MockProvider {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.calls)
    }

    fn answer(&self) -> Result<String, LlmError> {
        *self.calls.lock().unwrap() += 1;
        self.reply.clone().ok_or_else(|| LlmError::Provider {
            message: "mock provider unavailable".to_string(),
        })
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            id: "mock-1".to_string(),
            content: self.answer()?,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }

    fn stream(
        &self,
        _request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let events = match self.answer() {
            Ok(text) => vec![
                Ok(StreamEvent::Connected),
                Ok(StreamEvent::TextDelta { text }),
                Ok(StreamEvent::Done),
            ],
            Err(e) => vec![Ok(StreamEvent::Connected), Err(e)],
        };
        Box::pin(futures_util::stream::iter(events))
    }

    async fn count_tokens(&self, request: &CompletionRequest) -> Result<TokenCount, LlmError> {
        Ok(TokenCount {
            input_tokens: estimate_tokens(&request.messages),
        })
    }
}

/// App state over a fresh temporary database, using the given provider and
/// page mode.
pub async fn test_state_with_mode(provider: MockProvider, page_mode: CompletionMode) -> AppState {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_path_buf();
    // Leak tempdir so it lives for the test
    std::mem::forget(dir);

    let pool = DatabasePool::new(&default_database_url(&data_dir)).await.unwrap();
    let mut config = ServerConfig::default();
    config.completion.page_mode = page_mode;
    AppState::new(pool, BoxLlmProvider::new(provider), &config, data_dir).unwrap()
}

pub async fn test_state(provider: MockProvider) -> AppState {
    test_state_with_mode(provider, CompletionMode::Blocking).await
}
