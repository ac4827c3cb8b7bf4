use async_trait::async_trait;

use super::domain::{JobApplication, NewJobApplication, SearchFilter};

/// Storage abstraction so the service can run against Postgres or memory.
///
/// Each call is a single store operation; nothing spans calls.
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<JobApplication>, RepositoryError>;

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<JobApplication>, RepositoryError>;

    async fn get(&self, id: i32) -> Result<Option<JobApplication>, RepositoryError>;

    /// Insert and return the record with its assigned id.
    async fn create(&self, application: NewJobApplication)
        -> Result<JobApplication, RepositoryError>;

    /// Replace every column of the row with the same id. Returns `false` when
    /// no such row exists.
    async fn update(&self, application: &JobApplication) -> Result<bool, RepositoryError>;

    /// Returns `false` when no such row exists.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;

    async fn exists(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
