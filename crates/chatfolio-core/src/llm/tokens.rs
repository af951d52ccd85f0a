//! Character-based token estimation.
//!
//! Roughly four characters per token, plus a fixed overhead per message for
//! the role and message framing. Good enough for display; never used to
//! trim or reject requests.

use chatfolio_types::llm::Message;

/// Characters counted for each message's role and structure.
const MESSAGE_OVERHEAD_CHARS: usize = 10;

/// Estimate the input tokens of a message list.
pub fn estimate_tokens(messages: &[Message]) -> u32 {
    let total_chars: usize = messages
        .iter()
        .map(|m| m.content.chars().count() + MESSAGE_OVERHEAD_CHARS)
        .sum();
    (total_chars as f64 / 4.0).ceil() as u32
}
