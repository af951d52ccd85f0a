//! LLM provider abstractions for chatfolio.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `tokens`: character-based token estimation

pub mod box_provider;
pub mod provider;
pub mod tokens;
