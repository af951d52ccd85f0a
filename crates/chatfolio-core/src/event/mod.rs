//! Push-update event distribution.
//!
//! Provides an `EventBus` that fans `ChatEvent` messages out to every
//! connected live-channel client via a `tokio::sync::broadcast` channel.
//! Room filtering happens on the receiving side.

pub mod bus;

pub use bus::EventBus;
