//! SQLite project repository implementation.
//!
//! Implements `ProjectRepository` from `chatfolio-core` using sqlx with split read/write pools.

use chatfolio_core::repository::project::ProjectRepository;
use chatfolio_types::error::RepositoryError;
use chatfolio_types::project::Project;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ProjectRepository`.
pub struct SqliteProjectRepository {
    pool: DatabasePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Project, RepositoryError> {
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    Ok(Project {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl ProjectRepository for SqliteProjectRepository {
    async fn create(&self, name: &str) -> Result<Project, RepositoryError> {
        let created_at = Utc::now();

        let result = sqlx::query("INSERT INTO projects (name, created_at) VALUES (?, ?)")
            .bind(name)
            .bind(format_datetime(&created_at))
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(done) => Ok(Project {
                id: done.last_insert_rowid(),
                name: name.to_string(),
                created_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(name.to_string()))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, created_at FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(project_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM projects ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(project_from_row).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM projects")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(n as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::test_pool;

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = SqliteProjectRepository::new(test_pool().await);

        let created = repo.create("Demo").await.unwrap();
        let found = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Demo");
        assert_eq!(
            found.created_at.timestamp_micros(),
            created.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = SqliteProjectRepository::new(test_pool().await);
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_name_conflict() {
        let repo = SqliteProjectRepository::new(test_pool().await);

        repo.create("Demo").await.unwrap();
        let err = repo.create("Demo").await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(ref n) if n == "Demo"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let repo = SqliteProjectRepository::new(test_pool().await);
        for name in ["Zeta", "Alpha", "Mid"] {
            repo.create(name).await.unwrap();
        }

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_overlong_name_rejected_by_schema() {
        let repo = SqliteProjectRepository::new(test_pool().await);
        let err = repo.create(&"n".repeat(101)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
