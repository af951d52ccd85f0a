//! Live-channel events pushed to connected clients.
//!
//! Every event names the project it belongs to and is delivered only to
//! connections that joined that project's room. On the wire each event is a
//! JSON object `{"event": "<name>", "data": {...}}`.

use serde::{Deserialize, Serialize};

/// Status text sent when a live-channel turn could not be completed.
pub const ERROR_STATUS: &str = "Error processing your request.";

/// Status text sent when a live-channel turn names an unknown project.
pub const PROJECT_NOT_FOUND_STATUS: &str = "Project not found.";

/// An event published on the push-update channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A turn submitted through the page form was stored.
    UpdateConversation { message: String, project_id: i64 },

    /// A turn submitted over the live channel was answered and stored.
    ReceiveMessage { message: String, project_id: i64 },

    /// A live-channel turn failed.
    ReceiveStatus { status: String, project_id: i64 },
}

impl ChatEvent {
    /// The project room this event is scoped to.
    pub fn project_id(&self) -> i64 {
        match self {
            ChatEvent::UpdateConversation { project_id, .. }
            | ChatEvent::ReceiveMessage { project_id, .. }
            | ChatEvent::ReceiveStatus { project_id, .. } => *project_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_conversation_wire_format() {
        let event = ChatEvent::UpdateConversation {
            message: "Hi there".to_string(),
            project_id: 4,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "update_conversation");
        assert_eq!(value["data"]["message"], "Hi there");
        assert_eq!(value["data"]["project_id"], 4);
    }

    #[test]
    fn test_receive_status_wire_format() {
        let event = ChatEvent::ReceiveStatus {
            status: ERROR_STATUS.to_string(),
            project_id: 1,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "receive_status");
        assert_eq!(value["data"]["status"], ERROR_STATUS);
    }

    #[test]
    fn test_project_id_matches_payload() {
        let events = [
            (ChatEvent::UpdateConversation { message: String::new(), project_id: 1 }, "update_conversation"),
            (ChatEvent::ReceiveMessage { message: String::new(), project_id: 2 }, "receive_message"),
            (ChatEvent::ReceiveStatus { status: String::new(), project_id: 3 }, "receive_status"),
        ];
        for (event, tag) in events {
            let value = serde_json::to_value(&event).unwrap();
            assert_eq!(value["event"], tag);
            assert_eq!(value["data"]["project_id"], event.project_id());
        }
    }
}
