//! Application error type mapping to HTTP status codes and HTML error pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use chatfolio_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Project and conversation errors.
    Chat(ChatError),
    /// A page template failed to render.
    Render(tera::Error),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<tera::Error> for AppError {
    fn from(e: tera::Error) -> Self {
        AppError::Render(e)
    }
}

impl AppError {
    /// Status code and user-visible message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Chat(ChatError::ProjectNotFound(_)) => {
                (StatusCode::NOT_FOUND, "Project not found".to_string())
            }
            AppError::Chat(ChatError::InvalidName(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Chat(e @ ChatError::Conflict(_)) => (StatusCode::CONFLICT, e.to_string()),
            // Fallback only: the page and live paths handle completion
            // failures themselves and never convert them into AppError.
            AppError::Chat(ChatError::Completion(_)) => (
                StatusCode::BAD_GATEWAY,
                chatfolio_types::event::ERROR_STATUS.to_string(),
            ),
            AppError::Chat(ChatError::Storage(_)) | AppError::Render(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            AppError::Render(e) => tracing::error!(error = %e, "Page template failed to render"),
            AppError::Chat(e) if status.is_server_error() => {
                tracing::error!(error = %e, "Request failed")
            }
            AppError::Chat(e) => tracing::debug!(error = %e, %status, "Request rejected"),
        }

        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{code} | chatfolio</title></head>\n<body>\n<h1>{code}</h1>\n<p class=\"error\">{message}</p>\n<p><a href=\"/\">Back to projects</a></p>\n</body>\n</html>\n",
            code = status,
            message = tera::escape_html(&message),
        );

        (status, Html(body)).into_response()
    }
}
