//! WebSocket handler for the live chat channel.
//!
//! The `/ws` endpoint upgrades an HTTP connection to a WebSocket. Once
//! connected, the handler:
//!
//! - **Forwards events:** Subscribes to the [`EventBus`] on [`AppState`] and
//!   pushes every [`ChatEvent`] for a project room this connection joined.
//! - **Receives commands:** Parses incoming text frames as [`ClientEvent`]
//!   and handles room joins, message submissions, and pings.
//!
//! Each `send_message` runs in its own task, so a slow completion never
//! blocks the socket loop. Its outcome comes back through the bus like any
//! other event.
//!
//! [`EventBus`]: chatfolio_core::event::EventBus

use std::collections::HashSet;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;

use chatfolio_types::error::ChatError;
use chatfolio_types::event::{ChatEvent, ERROR_STATUS, PROJECT_NOT_FOUND_STATUS};
use chatfolio_types::llm::CompletionMode;

use crate::state::AppState;

/// Outbound reply to a client ping.
const PONG_FRAME: &str = r#"{"event":"pong"}"#;

/// Incoming event from a WebSocket client.
///
/// Clients send `{"event": "<name>", "data": {...}}` text frames.
/// Unknown or malformed frames are logged and ignored.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Submit a turn. Also joins the project's room.
    SendMessage { message: String, project_id: i64 },
    /// Subscribe to a project's room.
    Join { project_id: i64 },
    /// Keep-alive. Server responds with `{"event":"pong"}`.
    Ping,
}

/// Upgrade an HTTP request to a live-channel WebSocket.
///
/// This is mounted at `/ws` in the router.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Core WebSocket connection handler.
///
/// Uses `tokio::select!` to multiplex between bus events and client frames in
/// a single task, so replies like pong share the same sender.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let mut event_rx = state.event_bus.subscribe();
    let mut rooms: HashSet<i64> = HashSet::new();
    tracing::debug!("WebSocket connection opened");

    loop {
        tokio::select! {
            event_result = event_rx.recv() => {
                match event_result {
                    Ok(event) => {
                        if let Some(json) = frame_for(&rooms, &event) {
                            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "WebSocket subscriber lagged, skipping {n} events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_client_frame(&text, &mut rooms, &state) {
                            if ws_sender.send(Message::Text(reply.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!("WebSocket receive error: {err}");
                        break;
                    }
                    // Binary and protocol frames are handled by axum
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!(rooms = rooms.len(), "WebSocket connection closed");
}

/// The JSON frame to forward for `event`, if this connection joined its room.
fn frame_for(rooms: &HashSet<i64>, event: &ChatEvent) -> Option<String> {
    if !rooms.contains(&event.project_id()) {
        return None;
    }
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(err) => {
            tracing::warn!("Failed to serialize ChatEvent: {err}");
            None
        }
    }
}

/// Handle one inbound text frame. Returns a direct reply frame, if any.
fn handle_client_frame(text: &str, rooms: &mut HashSet<i64>, state: &AppState) -> Option<String> {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(raw = %text, error = %err, "Ignoring malformed WebSocket frame");
            return None;
        }
    };

    match event {
        ClientEvent::Join { project_id } => {
            rooms.insert(project_id);
            tracing::debug!(project_id, "Joined project room");
            None
        }
        ClientEvent::SendMessage { message, project_id } => {
            rooms.insert(project_id);
            if message.trim().is_empty() {
                tracing::debug!(project_id, "Ignoring blank live message");
                return None;
            }
            tokio::spawn(run_live_turn(state.clone(), project_id, message));
            None
        }
        ClientEvent::Ping => Some(PONG_FRAME.to_string()),
    }
}

/// Run one live-channel turn and publish its outcome to the project's room.
///
/// Always streams. The turn is stored only after the stream completed.
pub async fn run_live_turn(state: AppState, project_id: i64, message: String) {
    let outcome = state
        .chat_service
        .submit_turn(project_id, &message, CompletionMode::Streaming)
        .await;

    let event = match outcome {
        Ok(turn) => ChatEvent::ReceiveMessage {
            message: turn.chat_response,
            project_id,
        },
        Err(ChatError::ProjectNotFound(_)) => {
            tracing::debug!(project_id, "Live message for unknown project");
            ChatEvent::ReceiveStatus {
                status: PROJECT_NOT_FOUND_STATUS.to_string(),
                project_id,
            }
        }
        Err(e) => {
            tracing::warn!(project_id, error = %e, "Live message failed");
            ChatEvent::ReceiveStatus {
                status: ERROR_STATUS.to_string(),
                project_id,
            }
        }
    };

    state.event_bus.publish(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_state, MockProvider};

    #[test]
    fn parses_client_events() {
        let send: ClientEvent = serde_json::from_str(
            r#"{"event":"send_message","data":{"message":"Hello","project_id":3}}"#,
        )
        .unwrap();
        assert_eq!(
            send,
            ClientEvent::SendMessage {
                message: "Hello".to_string(),
                project_id: 3
            }
        );

        let join: ClientEvent =
            serde_json::from_str(r#"{"event":"join","data":{"project_id":3}}"#).unwrap();
        assert_eq!(join, ClientEvent::Join { project_id: 3 });

        let ping: ClientEvent = serde_json::from_str(r#"{"event":"ping"}"#).unwrap();
        assert_eq!(ping, ClientEvent::Ping);
    }

    #[test]
    fn events_are_scoped_to_joined_rooms() {
        let mut rooms = HashSet::new();
        let event = ChatEvent::ReceiveMessage {
            message: "Hi".to_string(),
            project_id: 5,
        };
        assert!(frame_for(&rooms, &event).is_none());

        rooms.insert(5);
        let json = frame_for(&rooms, &event).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "receive_message");
        assert_eq!(value["data"]["project_id"], 5);
    }

    #[tokio::test]
    async fn ping_replies_pong_and_malformed_is_ignored() {
        let state = test_state(MockProvider::replying("unused")).await;
        let mut rooms = HashSet::new();

        assert_eq!(
            handle_client_frame(r#"{"event":"ping"}"#, &mut rooms, &state).as_deref(),
            Some(PONG_FRAME)
        );
        assert!(handle_client_frame("not json", &mut rooms, &state).is_none());
        assert!(handle_client_frame(r#"{"event":"shout"}"#, &mut rooms, &state).is_none());
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn join_adds_room() {
        let state = test_state(MockProvider::replying("unused")).await;
        let mut rooms = HashSet::new();

        handle_client_frame(r#"{"event":"join","data":{"project_id":8}}"#, &mut rooms, &state);
        assert!(rooms.contains(&8));
    }

    #[tokio::test]
    async fn send_message_joins_room_and_publishes_answer() {
        let state = test_state(MockProvider::replying("Hi there")).await;
        let project = state
            .chat_service
            .create_project("Demo")
            .await
            .unwrap()
            .unwrap();
        let mut events = state.event_bus.subscribe();
        let mut rooms = HashSet::new();

        let frame = format!(
            r#"{{"event":"send_message","data":{{"message":"Hello","project_id":{}}}}}"#,
            project.id
        );
        assert!(handle_client_frame(&frame, &mut rooms, &state).is_none());
        assert!(rooms.contains(&project.id));

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            ChatEvent::ReceiveMessage {
                message: "Hi there".to_string(),
                project_id: project.id,
            }
        );
        assert_eq!(state.chat_service.count_turns(project.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn live_failure_publishes_status_and_stores_nothing() {
        let state = test_state(MockProvider::failing()).await;
        let project = state
            .chat_service
            .create_project("Demo")
            .await
            .unwrap()
            .unwrap();
        let mut events = state.event_bus.subscribe();

        run_live_turn(state.clone(), project.id, "Hello".to_string()).await;

        match events.recv().await.unwrap() {
            ChatEvent::ReceiveStatus { status, project_id } => {
                assert!(!status.is_empty());
                assert_eq!(status, ERROR_STATUS);
                assert_eq!(project_id, project.id);
            }
            other => panic!("expected receive_status, got {other:?}"),
        }
        let (_, turns) = state.chat_service.transcript(project.id).await.unwrap();
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn live_message_for_unknown_project_reports_not_found() {
        let state = test_state(MockProvider::replying("unused")).await;
        let mut events = state.event_bus.subscribe();

        run_live_turn(state.clone(), 404, "Hello".to_string()).await;

        assert_eq!(
            events.recv().await.unwrap(),
            ChatEvent::ReceiveStatus {
                status: PROJECT_NOT_FOUND_STATUS.to_string(),
                project_id: 404,
            }
        );
    }
}
