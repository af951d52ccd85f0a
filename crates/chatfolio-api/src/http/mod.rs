//! HTTP layer for chatfolio.
//!
//! Axum server rendering the project list and chat pages, plus a WebSocket
//! live channel at `/ws` and the bundled static assets under `/static`.

pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
