//! Broadcast event bus for distributing `ChatEvent` to live-channel clients.
//!
//! Built on `tokio::sync::broadcast`. Publishing with no active subscribers
//! is a no-op.

use chatfolio_types::event::ChatEvent;
use tokio::sync::broadcast;

/// Default channel capacity for the process-wide bus.
pub const DEFAULT_CAPACITY: usize = 256;

/// Multi-consumer bus for project-scoped chat events.
///
/// Cloning the bus clones the sender, so handlers and socket tasks can each
/// hold one.
pub struct EventBus {
    sender: broadcast::Sender<ChatEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new subscriber that will receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns how many subscribers the event reached. With none, the event
    /// is dropped.
    pub fn publish(&self, event: ChatEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}
