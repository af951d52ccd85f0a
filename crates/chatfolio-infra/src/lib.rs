//! Infrastructure layer for chatfolio.
//!
//! Contains implementations of the ports defined in `chatfolio-core`:
//! SQLite storage for projects and conversations, the OpenAI-compatible
//! completion provider, and the configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
