//! Conversation turns: history replay, the completion call, and the service
//! that stores each answered turn.

pub mod completion;
pub mod history;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use completion::CompletionClient;
pub use service::ChatService;
