use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in chatfolio-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by chat and project operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("project {0} not found")]
    ProjectNotFound(i64),

    #[error("invalid project name: {0}")]
    InvalidName(String),

    #[error("project '{0}' already exists")]
    Conflict(String),

    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),

    #[error("storage error: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(name) => ChatError::Conflict(name),
            other => ChatError::Storage(other),
        }
    }
}
