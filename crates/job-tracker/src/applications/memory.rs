use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::domain::{JobApplication, NewJobApplication, SearchFilter};
use super::repository::{JobApplicationRepository, RepositoryError};

/// Process-local store; ids are issued from 1 upwards like a serial column.
#[derive(Default, Clone)]
pub struct InMemoryJobApplicationRepository {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i32,
    records: BTreeMap<i32, JobApplication>,
}

impl InMemoryJobApplicationRepository {
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.records.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl JobApplicationRepository for InMemoryJobApplicationRepository {
    async fn list(&self) -> Result<Vec<JobApplication>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.values().cloned().collect())
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<JobApplication>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .records
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i32) -> Result<Option<JobApplication>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.get(&id).cloned())
    }

    async fn create(
        &self,
        application: NewJobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let mut state = self.lock()?;
        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Unavailable("id sequence exhausted".to_string()))?;
        state.last_id = id;

        let record = JobApplication::from_parts(id, application);
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, application: &JobApplication) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        match state.records.get_mut(&application.id) {
            Some(existing) => {
                *existing = application.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        Ok(state.records.remove(&id).is_some())
    }

    async fn exists(&self, id: i32) -> Result<bool, RepositoryError> {
        let state = self.lock()?;
        Ok(state.records.contains_key(&id))
    }
}
