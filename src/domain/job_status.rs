use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a pipeline job.
///
/// `Pending -> Scraped -> Completed` is the success path. `Failed` is reached when
/// scraping fails and `ProcessingFailed` when structuring a scraped job fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Scraped,
    Failed,
    Completed,
    ProcessingFailed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Scraped => "scraped",
            JobStatus::Failed => "failed",
            JobStatus::Completed => "completed",
            JobStatus::ProcessingFailed => "processing_failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::Completed | JobStatus::ProcessingFailed
        )
    }

    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Scraped)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Scraped, JobStatus::Failed)
                | (JobStatus::Scraped, JobStatus::Completed)
                | (JobStatus::Scraped, JobStatus::ProcessingFailed)
        )
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "scraped" => Ok(JobStatus::Scraped),
            "failed" => Ok(JobStatus::Failed),
            "completed" => Ok(JobStatus::Completed),
            "processing_failed" => Ok(JobStatus::ProcessingFailed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
