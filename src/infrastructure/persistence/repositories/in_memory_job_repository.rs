use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, JobSummary, Product, RawContent};

/// Process-local job store. Jobs are kept in insertion order and lost on restart.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<Vec<Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, id: JobId, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Job) + Send,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        apply(job);
        job.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, url: &str) -> Result<Job, RepositoryError> {
        let job = Job::new(url.to_string());
        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.iter().find(|j| j.id == id).cloned())
    }

    async fn list(
        &self,
        status: Option<JobStatus>,
        limit: usize,
    ) -> Result<Vec<JobSummary>, RepositoryError> {
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .filter(|j| status.is_none_or(|s| j.status == s))
            .take(limit)
            .map(Job::summary)
            .collect())
    }

    async fn set_raw_content(
        &self,
        id: JobId,
        content: &RawContent,
    ) -> Result<(), RepositoryError> {
        let content = content.clone();
        self.modify(id, move |job| job.raw_content = Some(content))
            .await
    }

    async fn set_structured_data(
        &self,
        id: JobId,
        data: &Product,
    ) -> Result<(), RepositoryError> {
        let data = data.clone();
        self.modify(id, move |job| job.structured_data = Some(data))
            .await
    }

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let error_message = error_message.map(str::to_string);
        self.modify(id, move |job| {
            job.status = status;
            job.error_message = error_message;
        })
        .await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
