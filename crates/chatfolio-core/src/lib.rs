//! Business logic and repository trait definitions for chatfolio.
//!
//! This crate defines the "ports" (repository traits and the LLM provider
//! trait) that the infrastructure layer implements. It depends only on
//! `chatfolio-types` -- never on `chatfolio-infra` or any database/IO crate.

pub mod chat;
pub mod event;
pub mod llm;
pub mod repository;
