//! Chat service orchestrating projects and conversation turns.
//!
//! ChatService ties the repositories, the history assembler, and the
//! completion client together: it creates and lists projects, reads
//! transcripts, and runs a full turn (load history, ask the model, store the
//! pair). A turn is stored only after the model answered.

use tracing::{debug, info};

use chatfolio_types::error::ChatError;
use chatfolio_types::llm::{CompletionMode, Message, TokenCount};
use chatfolio_types::project::{normalize_project_name, Conversation, NewConversation, Project};

use crate::chat::completion::CompletionClient;
use crate::chat::history::assemble_messages;
use crate::repository::conversation::ConversationRepository;
use crate::repository::project::ProjectRepository;

/// Orchestrates project and conversation operations.
///
/// Generic over the repository traits to maintain clean architecture
/// (chatfolio-core never depends on chatfolio-infra).
pub struct ChatService<P: ProjectRepository, C: ConversationRepository> {
    projects: P,
    conversations: C,
    completion: CompletionClient,
}

impl<P: ProjectRepository, C: ConversationRepository> ChatService<P, C> {
    pub fn new(projects: P, conversations: C, completion: CompletionClient) -> Self {
        Self {
            projects,
            conversations,
            completion,
        }
    }

    pub fn completion(&self) -> &CompletionClient {
        &self.completion
    }

    // --- Projects ---

    /// Create a project from a submitted name.
    ///
    /// A blank name is not an error: nothing is created and `Ok(None)` is
    /// returned. A taken name fails with [`ChatError::Conflict`].
    pub async fn create_project(&self, raw_name: &str) -> Result<Option<Project>, ChatError> {
        let name = match normalize_project_name(raw_name).map_err(ChatError::InvalidName)? {
            Some(name) => name,
            None => {
                debug!("Skipping project creation for blank name");
                return Ok(None);
            }
        };

        let project = self.projects.create(&name).await?;
        info!(project_id = project.id, name = %project.name, "Project created");
        Ok(Some(project))
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ChatError> {
        Ok(self.projects.list().await?)
    }

    pub async fn count_projects(&self) -> Result<u64, ChatError> {
        Ok(self.projects.count().await?)
    }

    pub async fn get_project(&self, project_id: i64) -> Result<Project, ChatError> {
        self.projects
            .get_by_id(project_id)
            .await?
            .ok_or(ChatError::ProjectNotFound(project_id))
    }

    // --- Conversations ---

    /// A project together with its turns, oldest first. Read-only.
    pub async fn transcript(
        &self,
        project_id: i64,
    ) -> Result<(Project, Vec<Conversation>), ChatError> {
        let project = self.get_project(project_id).await?;
        let turns = self.conversations.list_for_project(project_id).await?;
        Ok((project, turns))
    }

    pub async fn count_turns(&self, project_id: i64) -> Result<u64, ChatError> {
        Ok(self.conversations.count_for_project(project_id).await?)
    }

    /// Run one conversation turn and store it.
    ///
    /// Fails with [`ChatError::ProjectNotFound`] before any model call when
    /// the project does not exist, and with [`ChatError::Completion`] when the
    /// model call fails. Nothing is stored in either case.
    pub async fn submit_turn(
        &self,
        project_id: i64,
        user_input: &str,
        mode: CompletionMode,
    ) -> Result<Conversation, ChatError> {
        let (project, history) = self.transcript(project_id).await?;
        let messages = assemble_messages(&history, user_input);
        debug!(
            project_id = project.id,
            replayed_turns = history.len(),
            %mode,
            "Requesting completion"
        );

        let response = self.completion.respond(messages, mode).await?;

        let stored = self
            .conversations
            .append(NewConversation::now(
                project.id,
                user_input.to_string(),
                response,
            ))
            .await?;
        info!(
            project_id = project.id,
            conversation_id = stored.id,
            "Conversation turn stored"
        );
        debug!(user_input = %stored.user_input, chat_response = %stored.chat_response, "Stored turn");
        Ok(stored)
    }

    /// Estimate the tokens a single piece of text would use as a user message.
    pub async fn count_tokens(&self, text: &str) -> Result<TokenCount, ChatError> {
        Ok(self.completion.count_tokens(vec![Message::user(text)]).await?)
    }
}
