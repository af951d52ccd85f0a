//! Completion client: one chat-completion call per conversation turn.
//!
//! The client pins the model and temperature and offers the two consumption
//! shapes explicitly. [`CompletionMode::Blocking`] requests a non-streamed
//! answer and reads its single message. [`CompletionMode::Streaming`]
//! requests a streamed answer and drains every chunk, escaping the HTML
//! special characters `& < > " '` in each text fragment as it is appended.
//!
//! Errors are logged here and returned to the caller. There is no retry and
//! no partial answer: a stream that fails midway yields an error, not the
//! text received so far.

use futures_util::StreamExt;
use tracing::{debug, warn};

use chatfolio_types::llm::{
    CompletionMode, CompletionRequest, LlmError, Message, StreamEvent, TokenCount,
};

use crate::llm::box_provider::BoxLlmProvider;

/// Wraps an LLM provider with a fixed model and temperature.
#[derive(Debug)]
pub struct CompletionClient {
    provider: BoxLlmProvider,
    model: String,
    temperature: f64,
}

impl CompletionClient {
    pub fn new(provider: BoxLlmProvider, model: impl Into<String>, temperature: f64) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, messages: Vec<Message>, stream: bool) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: Some(self.temperature),
            max_tokens: None,
            stream,
        }
    }

    /// Obtain the assistant's answer for `messages` using the given mode.
    ///
    /// An answer with no text counts as a failure ([`LlmError::EmptyResponse`]).
    pub async fn respond(
        &self,
        messages: Vec<Message>,
        mode: CompletionMode,
    ) -> Result<String, LlmError> {
        let result = match mode {
            CompletionMode::Blocking => self.respond_blocking(messages).await,
            CompletionMode::Streaming => self.respond_streaming(messages).await,
        };

        if let Err(ref e) = result {
            warn!(
                provider = self.provider.name(),
                model = %self.model,
                %mode,
                error = %e,
                "Completion call failed"
            );
        }
        result
    }

    async fn respond_blocking(&self, messages: Vec<Message>) -> Result<String, LlmError> {
        let request = self.build_request(messages, false);
        let response = self.provider.complete(&request).await?;
        debug!(
            stop_reason = %response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Completion received"
        );

        if response.content.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(response.content)
    }

    async fn respond_streaming(&self, messages: Vec<Message>) -> Result<String, LlmError> {
        let request = self.build_request(messages, true);
        let mut stream = self.provider.stream(request);
        let mut accumulated = String::new();

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::TextDelta { text } if !text.is_empty() => {
                    accumulated.push_str(&escape_markup(&text));
                }
                StreamEvent::MessageDelta { stop_reason } => {
                    debug!(%stop_reason, "Stream finishing");
                }
                StreamEvent::Done => break,
                _ => {}
            }
        }

        if accumulated.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(accumulated)
    }

    /// Estimate the input tokens `messages` would use with this client's model.
    pub async fn count_tokens(&self, messages: Vec<Message>) -> Result<TokenCount, LlmError> {
        let request = self.build_request(messages, false);
        self.provider.count_tokens(&request).await
    }
}

/// Escape `& < > " '`. Everything else, `/` included, passes through.
fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&#34;")
        .replace('\'', "&#39;")
}
