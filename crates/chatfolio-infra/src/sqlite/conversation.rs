//! SQLite conversation repository implementation.
//!
//! Turns are append-only. Listing orders by `timestamp` then `id` so replay
//! order never depends on SQLite's row order.

use chatfolio_core::repository::conversation::ConversationRepository;
use chatfolio_types::error::RepositoryError;
use chatfolio_types::project::{Conversation, NewConversation};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to a domain Conversation.
struct ConversationRow {
    id: i64,
    project_id: i64,
    timestamp: String,
    user_input: String,
    chat_response: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            project_id: row.try_get("project_id")?,
            timestamp: row.try_get("timestamp")?,
            user_input: row.try_get("user_input")?,
            chat_response: row.try_get("chat_response")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: self.id,
            project_id: self.project_id,
            timestamp: parse_datetime(&self.timestamp)?,
            user_input: self.user_input,
            chat_response: self.chat_response,
        })
    }
}

impl ConversationRepository for SqliteConversationRepository {
    async fn append(&self, turn: NewConversation) -> Result<Conversation, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO conversations (project_id, timestamp, user_input, chat_response)
             VALUES (?, ?, ?, ?)",
        )
        .bind(turn.project_id)
        .bind(format_datetime(&turn.timestamp))
        .bind(&turn.user_input)
        .bind(&turn.chat_response)
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(done) => Ok(turn.into_conversation(done.last_insert_rowid())),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("FOREIGN KEY") => {
                Err(RepositoryError::NotFound)
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn list_for_project(&self, project_id: i64) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, project_id, timestamp, user_input, chat_response
             FROM conversations
             WHERE project_id = ?
             ORDER BY timestamp ASC, id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row = ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            turns.push(turn_row.into_conversation()?);
        }
        Ok(turns)
    }

    async fn count_for_project(&self, project_id: i64) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM conversations WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(n as u64)
    }
}
