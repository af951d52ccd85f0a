//! Conversation repository trait definition.

use chatfolio_types::error::RepositoryError;
use chatfolio_types::project::{Conversation, NewConversation};

/// Repository trait for stored conversation turns.
///
/// Turns are append-only: there is no update or delete.
pub trait ConversationRepository: Send + Sync {
    /// Store a completed turn and return it with its new id.
    fn append(
        &self,
        turn: NewConversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// All turns of a project, ordered by timestamp then id (oldest first).
    fn list_for_project(
        &self,
        project_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Number of turns stored for a project.
    fn count_for_project(
        &self,
        project_id: i64,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
