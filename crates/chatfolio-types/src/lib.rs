//! Shared domain types for chatfolio.
//!
//! Projects, their stored conversation turns, the chat messages replayed to
//! the completion model, live-channel events, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, secrecy.

pub mod config;
pub mod error;
pub mod event;
pub mod llm;
pub mod project;
