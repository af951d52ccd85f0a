//! Scripted provider and in-memory repositories shared by the chat tests.

use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futures_util::Stream;

use chatfolio_types::error::RepositoryError;
use chatfolio_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, StreamEvent, TokenCount, Usage,
};
use chatfolio_types::project::{Conversation, NewConversation, Project};
use chrono::Utc;

use crate::llm::provider::LlmProvider;
use crate::llm::tokens::estimate_tokens;
use crate::repository::conversation::ConversationRepository;
use crate::repository::project::ProjectRepository;

#[derive(Clone)]
enum Script {
    Reply(Vec<String>),
    Fail,
    FailAfter(Vec<String>),
}

/// A provider that answers every request from a fixed script and records
/// what it was asked.
pub struct ScriptedProvider {
    script: Script,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    /// Reply with `fragments`: streamed one by one, or joined for a blocking call.
    pub fn replying(fragments: &[&str]) -> Self {
        Self::with_script(Script::Reply(fragments.iter().map(|f| f.to_string()).collect()))
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    /// Stream `fragments`, then fail.
    pub fn failing_after(fragments: &[&str]) -> Self {
        Self::with_script(Script::FailAfter(
            fragments.iter().map(|f| f.to_string()).collect(),
        ))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle to the requests seen so far.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }

    fn record(&self, request: &CompletionRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.record(request);
        match &self.script {
            Script::Reply(fragments) => Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: fragments.concat(),
                model: request.model.clone(),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            Script::Fail | Script::FailAfter(_) => Err(LlmError::Provider {
                message: "scripted failure".to_string(),
            }),
        }
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.record(&request);
        let mut events: Vec<Result<StreamEvent, LlmError>> = vec![Ok(StreamEvent::Connected)];
        match &self.script {
            Script::Reply(fragments) => {
                events.extend(
                    fragments
                        .iter()
                        .map(|text| Ok(StreamEvent::TextDelta { text: text.clone() })),
                );
                events.push(Ok(StreamEvent::MessageDelta {
                    stop_reason: StopReason::EndTurn,
                }));
                events.push(Ok(StreamEvent::Done));
            }
            Script::Fail => events = vec![Err(LlmError::Provider {
                message: "scripted failure".to_string(),
            })],
            Script::FailAfter(fragments) => {
                events.extend(
                    fragments
                        .iter()
                        .map(|text| Ok(StreamEvent::TextDelta { text: text.clone() })),
                );
                events.push(Err(LlmError::Stream("connection reset".to_string())));
            }
        }
        Box::pin(futures_util::stream::iter(events))
    }

    async fn count_tokens(&self, request: &CompletionRequest) -> Result<TokenCount, LlmError> {
        Ok(TokenCount {
            input_tokens: estimate_tokens(&request.messages),
        })
    }
}

/// Project storage backed by a vector.
#[derive(Default)]
pub struct MemoryProjects {
    rows: Mutex<Vec<Project>>,
}

impl ProjectRepository for MemoryProjects {
    async fn create(&self, name: &str) -> Result<Project, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.name == name) {
            return Err(RepositoryError::Conflict(name.to_string()));
        }
        let project = Project {
            id: rows.len() as i64 + 1,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        rows.push(project.clone());
        Ok(project)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

/// Conversation storage backed by a vector.
#[derive(Default)]
pub struct MemoryConversations {
    rows: Mutex<Vec<Conversation>>,
}

impl ConversationRepository for MemoryConversations {
    async fn append(&self, turn: NewConversation) -> Result<Conversation, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let stored = turn.into_conversation(rows.len() as i64 + 1);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_project(&self, project_id: i64) -> Result<Vec<Conversation>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn count_for_project(&self, project_id: i64) -> Result<u64, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.project_id == project_id)
            .count() as u64)
    }
}
