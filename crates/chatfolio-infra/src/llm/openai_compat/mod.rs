//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] talks to OpenAI or any endpoint that
//! speaks the chat-completions protocol, selected by base URL.
//!
//! Uses [`async_openai`] for type-safe request/response handling and
//! built-in SSE streaming.

pub mod config;
pub mod streaming;

use std::pin::Pin;

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionStreamOptions,
    CreateChatCompletionRequest,
};
use async_openai::Client;
use futures_util::Stream;
use secrecy::ExposeSecret;

use chatfolio_core::llm::provider::LlmProvider;
use chatfolio_core::llm::tokens::estimate_tokens;
use chatfolio_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, StopReason,
    StreamEvent, TokenCount, Usage,
};

use self::config::OpenAiCompatConfig;
use self::streaming::{map_finish_reason, map_openai_stream};

/// Provider for any OpenAI-compatible API.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key
/// stored inside the `async_openai::Client`.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_base(&config.base_url);
        if let Some(ref key) = config.api_key {
            openai_config = openai_config.with_api_key(key.expose_secret());
        }

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest, stream: bool) -> CreateChatCompletionRequest {
        let messages: Vec<ChatCompletionRequestMessage> =
            request.messages.iter().map(to_openai_message).collect();

        // Use the model from the request if set, otherwise fall back to config default
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        let mut req = CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        };

        if stream {
            req.stream = Some(true);
            req.stream_options = Some(ChatCompletionStreamOptions {
                include_usage: Some(true),
                include_obfuscation: None,
            });
        }

        req
    }
}

fn to_openai_message(msg: &Message) -> ChatCompletionRequestMessage {
    match msg.role {
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
            name: None,
        }),
        MessageRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    msg.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request, false);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let first = response.choices.first();
        let content = first
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        let stop_reason = first
            .and_then(|c| c.finish_reason.as_ref())
            .map(map_finish_reason)
            .unwrap_or(StopReason::EndTurn);

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        let oai_request = self.build_request(&request, true);

        // Clone the client for the 'static stream closure
        let client = self.client.clone();

        Box::pin(async_stream::try_stream! {
            let oai_stream = client
                .chat()
                .create_stream(oai_request)
                .await
                .map_err(map_openai_error)?;

            let mut inner = map_openai_stream(oai_stream);

            use futures_util::StreamExt;
            while let Some(event) = inner.next().await {
                yield event?;
            }
        })
    }

    async fn count_tokens(&self, request: &CompletionRequest) -> Result<TokenCount, LlmError> {
        Ok(TokenCount {
            input_tokens: estimate_tokens(&request.messages),
        })
    }
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited
            } else if code == "context_length_exceeded"
                || api_err.message.contains("maximum context length")
            {
                LlmError::ContextLengthExceeded
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited,
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::StreamError(stream_err) => LlmError::Stream(stream_err.to_string()),
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4-0125-preview".to_string(),
            messages,
            temperature: Some(0.2),
            max_tokens: None,
            stream: false,
        }
    }

    fn test_provider(model: &str) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(config::openai_defaults(
            Some(SecretString::from("sk-test")),
            model,
        ))
    }

    #[test]
    fn test_openai_factory() {
        let provider = test_provider("gpt-4-0125-preview");
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model, "gpt-4-0125-preview");
    }

    #[test]
    fn test_build_request_replays_history_in_order() {
        let provider = test_provider("gpt-4o");
        let oai_req = provider.build_request(
            &request(vec![
                Message::user("Hello"),
                Message::assistant("Hi there"),
                Message::user("How are you?"),
            ]),
            false,
        );

        assert_eq!(oai_req.model, "gpt-4-0125-preview");
        assert_eq!(oai_req.messages.len(), 3);
        assert!(matches!(oai_req.messages[0], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(
            oai_req.messages[1],
            ChatCompletionRequestMessage::Assistant(_)
        ));
        assert!(matches!(oai_req.messages[2], ChatCompletionRequestMessage::User(_)));
        assert_eq!(oai_req.temperature, Some(0.2));
        assert!(oai_req.max_completion_tokens.is_none());
        assert!(oai_req.stream.is_none());
        assert!(oai_req.stream_options.is_none());
    }

    #[test]
    fn test_build_request_streaming() {
        let provider = test_provider("gpt-4o");
        let oai_req = provider.build_request(&request(vec![Message::user("Hello")]), true);

        assert_eq!(oai_req.stream, Some(true));
        let opts = oai_req.stream_options.unwrap();
        assert_eq!(opts.include_usage, Some(true));
    }

    #[test]
    fn test_build_request_empty_model_uses_default() {
        let provider = test_provider("gpt-4o");
        let mut req = request(vec![]);
        req.model = String::new();

        let oai_req = provider.build_request(&req, false);
        assert_eq!(oai_req.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_count_tokens_estimation() {
        let provider = test_provider("gpt-4o");
        // 6 chars + 10 overhead = 16 chars -> 4 tokens
        let count = provider
            .count_tokens(&request(vec![Message::user("Hello!")]))
            .await
            .unwrap();
        assert_eq!(count.input_tokens, 4);
    }

    #[test]
    fn test_map_openai_error_api_auth() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Incorrect API key provided".to_string(),
            r#type: Some("authentication_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[test]
    fn test_map_openai_error_rate_limit() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Rate limit exceeded".to_string(),
            r#type: Some("rate_limit_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::RateLimited));
    }

    #[test]
    fn test_map_openai_error_context_length() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "This model's maximum context length is 128000 tokens".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: Some("context_length_exceeded".to_string()),
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::ContextLengthExceeded));
    }

    #[test]
    fn test_map_openai_error_invalid_argument() {
        use async_openai::error::OpenAIError;
        let err = map_openai_error(OpenAIError::InvalidArgument("bad arg".to_string()));
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }
}
