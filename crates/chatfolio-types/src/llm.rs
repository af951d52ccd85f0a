//! LLM request/response types for chatfolio.
//!
//! These types model the data shapes exchanged with the chat-completion
//! backend: role-tagged messages, completion requests, streaming events,
//! usage tracking, and error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// How a completion call is consumed.
///
/// `Blocking` asks for a single non-streamed message; `Streaming` asks for a
/// streamed answer and drains every chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionMode {
    #[default]
    Blocking,
    Streaming,
}

impl fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionMode::Blocking => write!(f, "blocking"),
            CompletionMode::Streaming => write!(f, "streaming"),
        }
    }
}

impl FromStr for CompletionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blocking" => Ok(CompletionMode::Blocking),
            "streaming" => Ok(CompletionMode::Streaming),
            other => Err(format!("invalid completion mode: '{other}'")),
        }
    }
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: bool,
}

/// Response from an LLM provider for a non-streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Reason why the LLM stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::ContentFilter => write!(f, "content_filter"),
        }
    }
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Token count for a request (used by count_tokens).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenCount {
    pub input_tokens: u32,
}

/// Events emitted during a streaming LLM response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Connection established with the provider.
    Connected,

    /// An incremental text fragment.
    TextDelta { text: String },

    /// The message is finishing with a stop reason.
    MessageDelta { stop_reason: StopReason },

    /// Token usage information.
    Usage(Usage),

    /// The stream has completed.
    Done,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("context length exceeded")]
    ContextLengthExceeded,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("provider returned no content")]
    EmptyResponse,
}
