use async_trait::async_trait;

use crate::domain::{Job, JobId, JobStatus, JobSummary, Product, RawContent};

use super::RepositoryError;

/// Persistence for pipeline jobs.
///
/// The repository is a passive record store: it applies whatever status it is given
/// and leaves transition rules to its callers. Mutations against an unknown id fail
/// with [`RepositoryError::NotFound`].
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts a new `pending` job for `url`.
    async fn create(&self, url: &str) -> Result<Job, RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// Lists jobs in insertion order, oldest first.
    async fn list(
        &self,
        status: Option<JobStatus>,
        limit: usize,
    ) -> Result<Vec<JobSummary>, RepositoryError>;

    async fn set_raw_content(
        &self,
        id: JobId,
        content: &RawContent,
    ) -> Result<(), RepositoryError>;

    async fn set_structured_data(&self, id: JobId, data: &Product)
    -> Result<(), RepositoryError>;

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    async fn ping(&self) -> Result<(), RepositoryError>;
}
