//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and the
//! web server. `ChatService` is generic over its repository traits, but
//! AppState pins it to the SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use chatfolio_core::chat::completion::CompletionClient;
use chatfolio_core::chat::service::ChatService;
use chatfolio_core::event::EventBus;
use chatfolio_core::llm::box_provider::BoxLlmProvider;
use chatfolio_infra::config::resolve_database_url;
use chatfolio_infra::llm::create_provider;
use chatfolio_infra::sqlite::conversation::SqliteConversationRepository;
use chatfolio_infra::sqlite::pool::DatabasePool;
use chatfolio_infra::sqlite::project::SqliteProjectRepository;
use chatfolio_types::config::ServerConfig;
use chatfolio_types::llm::CompletionMode;

use crate::http::pages::PageRenderer;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteProjectRepository, SqliteConversationRepository>;

/// Shared application state.
///
/// Built once at startup and passed to handlers via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub event_bus: EventBus,
    pub pages: Arc<PageRenderer>,
    /// How the page form path consumes completions.
    pub page_mode: CompletionMode,
    pub static_dir: PathBuf,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Wire services around an open pool and an already-built provider.
    pub fn new(
        db_pool: DatabasePool,
        provider: BoxLlmProvider,
        config: &ServerConfig,
        data_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let completion = CompletionClient::new(
            provider,
            config.completion.model.clone(),
            config.completion.temperature,
        );
        let chat_service = ChatService::new(
            SqliteProjectRepository::new(db_pool.clone()),
            SqliteConversationRepository::new(db_pool.clone()),
            completion,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            event_bus: EventBus::default(),
            pages: Arc::new(PageRenderer::new()?),
            page_mode: config.completion.page_mode,
            static_dir: PathBuf::from(&config.server.static_dir),
            data_dir,
            db_pool,
        })
    }

    /// Initialize the application state: create the data directory, connect
    /// to the database (running migrations), and build the completion provider.
    pub async fn init(config: &ServerConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = resolve_database_url(config, &data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;

        let provider = create_provider(&config.completion);
        tracing::debug!(
            provider = provider.name(),
            model = %config.completion.model,
            page_mode = %config.completion.page_mode,
            "Completion provider ready"
        );

        Self::new(db_pool, provider, config, data_dir)
    }
}
