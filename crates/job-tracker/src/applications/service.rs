use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{JobApplication, JobApplicationRequest, SearchFilter};
use super::repository::{JobApplicationRepository, RepositoryError};
use super::validation::ValidationErrors;

/// Request contract between the HTTP handlers and the repository.
pub struct JobApplicationService {
    repository: Arc<dyn JobApplicationRepository>,
}

impl JobApplicationService {
    pub fn new(repository: Arc<dyn JobApplicationRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<JobApplication>, JobApplicationServiceError> {
        Ok(self.repository.list().await?)
    }

    pub async fn search(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<JobApplication>, JobApplicationServiceError> {
        if filter.is_empty() {
            return self.list().await;
        }
        Ok(self.repository.search(filter).await?)
    }

    pub async fn get(&self, id: i32) -> Result<JobApplication, JobApplicationServiceError> {
        self.repository
            .get(id)
            .await?
            .ok_or(JobApplicationServiceError::NotFound(id))
    }

    /// Validate and persist a new record. Any id in the request is ignored.
    pub async fn create(
        &self,
        request: JobApplicationRequest,
    ) -> Result<JobApplication, JobApplicationServiceError> {
        let details = request.validate()?;
        let created = self.repository.create(details).await?;
        info!(id = created.id, company = %created.company, "job application created");
        Ok(created)
    }

    /// Replace the record at `id` with the request body.
    ///
    /// Checks run in order: body id equals `id`, the body is valid, the
    /// record exists.
    pub async fn update(
        &self,
        id: i32,
        request: JobApplicationRequest,
    ) -> Result<(), JobApplicationServiceError> {
        if request.id != Some(id) {
            return Err(JobApplicationServiceError::IdMismatch {
                path: id,
                body: request.id,
            });
        }

        let details = request.validate()?;

        if !self.repository.exists(id).await? {
            return Err(JobApplicationServiceError::NotFound(id));
        }

        let application = JobApplication::from_parts(id, details);
        // The row can vanish between the existence check and the write.
        if !self.repository.update(&application).await? {
            return Err(JobApplicationServiceError::NotFound(id));
        }

        info!(id, "job application updated");
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<(), JobApplicationServiceError> {
        if !self.repository.exists(id).await? {
            debug!(id, "delete requested for unknown job application");
            return Err(JobApplicationServiceError::NotFound(id));
        }

        if !self.repository.delete(id).await? {
            return Err(JobApplicationServiceError::NotFound(id));
        }

        info!(id, "job application deleted");
        Ok(())
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum JobApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("ID mismatch")]
    IdMismatch { path: i32, body: Option<i32> },
    #[error("job application {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
