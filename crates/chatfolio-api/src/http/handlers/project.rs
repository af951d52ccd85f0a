//! Project list page handlers: `GET /` and `POST /`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use chatfolio_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Form body of the "new project" form.
#[derive(Debug, Deserialize)]
pub struct NewProjectForm {
    #[serde(default)]
    pub project_name: String,
}

/// GET / - Render the project list.
pub async fn list_projects(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let projects = state.chat_service.list_projects().await?;
    Ok(Html(state.pages.index(&projects, None)?))
}

/// POST / - Create a project and redirect to its chat page.
///
/// A blank name re-renders the list without creating anything. A taken name
/// re-renders the list with an error and status 409.
pub async fn create_project(
    State(state): State<AppState>,
    Form(form): Form<NewProjectForm>,
) -> Result<Response, AppError> {
    let rejection = match state.chat_service.create_project(&form.project_name).await {
        Ok(Some(project)) => {
            return Ok(Redirect::to(&format!("/chat/{}/", project.id)).into_response());
        }
        Ok(None) => None,
        Err(e @ ChatError::Conflict(_)) => Some((StatusCode::CONFLICT, e.to_string())),
        Err(ChatError::InvalidName(msg)) => Some((StatusCode::BAD_REQUEST, msg)),
        Err(e) => return Err(e.into()),
    };

    let projects = state.chat_service.list_projects().await?;
    let error = rejection.as_ref().map(|(_, msg)| msg.as_str());
    let page = Html(state.pages.index(&projects, error)?);
    let status = rejection.map_or(StatusCode::OK, |(status, _)| status);
    Ok((status, page).into_response())
}
