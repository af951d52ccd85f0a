//! Chat page handlers: `GET /chat/{project_id}/` and `POST /chat/{project_id}/`.

use axum::extract::{Path, State};
use axum::response::Html;
use axum::Form;
use serde::Deserialize;

use chatfolio_types::error::ChatError;
use chatfolio_types::event::{ChatEvent, ERROR_STATUS};

use crate::http::error::AppError;
use crate::state::AppState;

/// Form body of the chat page's submission form.
#[derive(Debug, Deserialize)]
pub struct TurnForm {
    #[serde(default)]
    pub user_input: String,
}

/// GET /chat/{project_id}/ - Render the transcript. Read-only.
pub async fn show_chat(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let (project, turns) = state.chat_service.transcript(project_id).await?;
    Ok(Html(state.pages.chat(&project, &turns, None)?))
}

/// POST /chat/{project_id}/ - Submit a turn through the page form.
///
/// On success the turn is stored and `update_conversation` is published to
/// the project's room. On a failed completion nothing is stored or published
/// and the page shows an error notice. The transcript is re-rendered either way.
pub async fn submit_chat(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Form(form): Form<TurnForm>,
) -> Result<Html<String>, AppError> {
    let notice = if form.user_input.trim().is_empty() {
        // Still 404s for an unknown project below.
        None
    } else {
        match state
            .chat_service
            .submit_turn(project_id, &form.user_input, state.page_mode)
            .await
        {
            Ok(turn) => {
                let delivered = state.event_bus.publish(ChatEvent::UpdateConversation {
                    message: turn.chat_response,
                    project_id,
                });
                tracing::debug!(project_id, delivered, "Published update_conversation");
                None
            }
            Err(ChatError::Completion(e)) => {
                tracing::warn!(project_id, error = %e, "Page submission got no response");
                Some(ERROR_STATUS)
            }
            Err(e) => return Err(e.into()),
        }
    };

    let (project, turns) = state.chat_service.transcript(project_id).await?;
    Ok(Html(state.pages.chat(&project, &turns, notice)?))
}
