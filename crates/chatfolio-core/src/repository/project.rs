//! Project repository trait definition.

use chatfolio_types::error::RepositoryError;
use chatfolio_types::project::Project;

/// Repository trait for project persistence.
///
/// Implementations live in chatfolio-infra (e.g., SqliteProjectRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ProjectRepository: Send + Sync {
    /// Insert a project with the given name and return it with its new id.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the name is taken.
    fn create(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Project, RepositoryError>> + Send;

    /// Get a project by its id.
    fn get_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Project>, RepositoryError>> + Send;

    /// List all projects ordered by id.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Project>, RepositoryError>> + Send;

    /// Total number of projects.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
