use chrono::{DateTime, Utc};

use super::{JobId, JobStatus, Product, RawContent};

/// One pipeline run for one source URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub url: String,
    pub status: JobStatus,
    pub raw_content: Option<RawContent>,
    pub structured_data: Option<Product>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(url: String) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            url,
            status: JobStatus::Pending,
            raw_content: None,
            structured_data: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id,
            url: self.url.clone(),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub id: JobId,
    pub url: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
