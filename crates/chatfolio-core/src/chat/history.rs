//! Conversation history assembly.
//!
//! Rebuilds the message list replayed to the completion model from a
//! project's stored turns. Every stored turn becomes a `user` message followed
//! by an `assistant` message; the new user input goes last. Nothing is
//! truncated, merged, or deduplicated.

use chatfolio_types::llm::Message;
use chatfolio_types::project::Conversation;

/// Build the ordered message list for a new turn.
///
/// Turns are sorted by `(timestamp, id)` before replay so the order never
/// depends on how storage returned them. The result always holds
/// `2 * turns.len() + 1` messages.
pub fn assemble_messages(turns: &[Conversation], user_input: &str) -> Vec<Message> {
    let mut ordered: Vec<&Conversation> = turns.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

    let mut messages = Vec::with_capacity(ordered.len() * 2 + 1);
    for turn in ordered {
        messages.push(Message::user(turn.user_input.clone()));
        messages.push(Message::assistant(turn.chat_response.clone()));
    }
    messages.push(Message::user(user_input));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatfolio_types::llm::MessageRole;
    use chrono::{Duration, TimeZone, Utc};

    fn turn(id: i64, offset_secs: i64, input: &str, response: &str) -> Conversation {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Conversation {
            id,
            project_id: 1,
            timestamp: base + Duration::seconds(offset_secs),
            user_input: input.to_string(),
            chat_response: response.to_string(),
        }
    }

    #[test]
    fn empty_history_yields_only_new_message() {
        let messages = assemble_messages(&[], "Hello");
        assert_eq!(messages, vec![Message::user("Hello")]);
    }

    #[test]
    fn each_turn_yields_user_then_assistant() {
        let turns = vec![turn(1, 0, "q1", "a1"), turn(2, 5, "q2", "a2"), turn(3, 9, "q3", "a3")];
        let messages = assemble_messages(&turns, "q4");

        assert_eq!(messages.len(), 2 * turns.len() + 1);
        for (i, pair) in messages[..6].chunks(2).enumerate() {
            assert_eq!(pair[0].role, MessageRole::User);
            assert_eq!(pair[0].content, format!("q{}", i + 1));
            assert_eq!(pair[1].role, MessageRole::Assistant);
            assert_eq!(pair[1].content, format!("a{}", i + 1));
        }
        assert_eq!(messages.last().unwrap(), &Message::user("q4"));
    }

    #[test]
    fn out_of_order_rows_are_replayed_chronologically() {
        let turns = vec![turn(3, 20, "third", "c"), turn(1, 0, "first", "a"), turn(2, 10, "second", "b")];
        let messages = assemble_messages(&turns, "next");
        let user_texts: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(user_texts, vec!["first", "second", "third", "next"]);
    }

    #[test]
    fn equal_timestamps_fall_back_to_id() {
        let turns = vec![turn(9, 0, "later id", "y"), turn(4, 0, "earlier id", "x")];
        let messages = assemble_messages(&turns, "now");
        assert_eq!(messages[0].content, "earlier id");
        assert_eq!(messages[1].content, "x");
        assert_eq!(messages[2].content, "later id");
    }

    #[test]
    fn duplicate_turns_are_kept() {
        let turns = vec![turn(1, 0, "same", "same"), turn(2, 1, "same", "same")];
        assert_eq!(assemble_messages(&turns, "same").len(), 5);
    }
}
