//! Project and conversation types.
//!
//! A project is a named container for one conversation thread. Each stored
//! [`Conversation`] is a single completed turn: the user's input together with
//! the assistant's response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a project name, in characters.
pub const MAX_PROJECT_NAME_LEN: usize = 100;

/// A named conversation container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One persisted (user input, assistant response) pair.
///
/// Rows are only ever written after a response was obtained, so both texts
/// are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub project_id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub chat_response: String,
}

/// A conversation turn that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub project_id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub chat_response: String,
}

impl NewConversation {
    /// Build a new turn stamped with the current time.
    pub fn now(project_id: i64, user_input: String, chat_response: String) -> Self {
        Self {
            project_id,
            timestamp: Utc::now(),
            user_input,
            chat_response,
        }
    }

    /// Attach the identifier assigned by storage.
    pub fn into_conversation(self, id: i64) -> Conversation {
        Conversation {
            id,
            project_id: self.project_id,
            timestamp: self.timestamp,
            user_input: self.user_input,
            chat_response: self.chat_response,
        }
    }
}

/// Validate a submitted project name.
///
/// Returns `Ok(None)` for a blank name (the submission is skipped),
/// `Ok(Some(trimmed))` for a usable one, and `Err` when it is too long.
pub fn normalize_project_name(raw: &str) -> Result<Option<String>, String> {
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(format!(
            "project name must be at most {MAX_PROJECT_NAME_LEN} characters"
        ));
    }
    Ok(Some(name.to_string()))
}
