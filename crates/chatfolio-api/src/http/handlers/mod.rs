//! HTTP request handlers: server-rendered pages and the live WebSocket channel.

pub mod chat;
pub mod project;
pub mod ws;
