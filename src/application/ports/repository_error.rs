use crate::domain::JobId;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}
