use crate::application::ports::RepositoryError;
use crate::application::services::{ScrapeError, StructuringError};
use crate::domain::{JobId, JobStatus};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("scraping failed: {0}")]
    Scraping(ScrapeError),
    #[error("processing failed: {0}")]
    Processing(StructuringError),
    #[error("{0}")]
    RateLimited(StructuringError),
    #[error("database: {0}")]
    Database(RepositoryError),
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("invalid job status: {current}. Job must be in 'scraped' state")]
    InvalidState { job_id: JobId, current: JobStatus },
}

impl From<ScrapeError> for PipelineError {
    fn from(e: ScrapeError) -> Self {
        match e {
            ScrapeError::InvalidUrl(msg) => PipelineError::InvalidInput(msg),
            other => PipelineError::Scraping(other),
        }
    }
}

impl From<StructuringError> for PipelineError {
    fn from(e: StructuringError) -> Self {
        match e {
            e @ StructuringError::RateLimited { .. } => PipelineError::RateLimited(e),
            other => PipelineError::Processing(other),
        }
    }
}

impl From<RepositoryError> for PipelineError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(id) => PipelineError::NotFound(id),
            other => PipelineError::Database(other),
        }
    }
}
