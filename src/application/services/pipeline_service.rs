use std::sync::Arc;

use url::Url;

use crate::application::ports::JobRepository;
use crate::application::services::{
    PipelineError, ScrapeService, StructuringError, StructuringService,
};
use crate::domain::{Job, JobId, JobStatus, JobSummary, Product, RawContent};

pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const MAX_LIST_LIMIT: usize = 100;

/// Drives jobs through `pending -> scraped -> completed`.
///
/// Every failure after a job exists moves it to a failure terminal state before the
/// error is returned, so no job is left in an in-progress status once a caller has
/// seen an error.
pub struct PipelineService {
    job_repository: Arc<dyn JobRepository>,
    scrape_service: ScrapeService,
    structuring_service: StructuringService,
}

impl PipelineService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        scrape_service: ScrapeService,
        structuring_service: StructuringService,
    ) -> Self {
        Self {
            job_repository,
            scrape_service,
            structuring_service,
        }
    }

    /// Creates a job for `url` and runs the scrape step against it.
    #[tracing::instrument(skip(self))]
    pub async fn scrape(&self, url: &str) -> Result<Job, PipelineError> {
        let url = self.scrape_service.validate_url(url)?;
        let mut job = self.job_repository.create(url.as_str()).await?;

        tracing::info!(job_id = %job.id, "Scrape job created");

        let guard = AbandonedJobGuard::new(Arc::clone(&self.job_repository), job.id);

        let outcome = match self.run_scrape(&job, &url).await {
            Ok(content) => {
                job.status = JobStatus::Scraped;
                job.raw_content = Some(content);
                tracing::info!(job_id = %job.id, "Job scraped");
                Ok(job)
            }
            Err(e) => {
                self.mark_failed(job.id, JobStatus::Failed, &e).await;
                Err(e)
            }
        };

        guard.disarm();
        outcome
    }

    /// Runs the structure step for a job that has been scraped.
    #[tracing::instrument(skip(self), fields(job_id = %job_id))]
    pub async fn process(&self, job_id: JobId) -> Result<Product, PipelineError> {
        let job = self.get_job(job_id).await?;

        if !job.status.can_transition_to(JobStatus::Completed) {
            tracing::warn!(status = %job.status, "Refusing to process job");
            return Err(PipelineError::InvalidState {
                job_id,
                current: job.status,
            });
        }

        match self.run_structuring(&job).await {
            Ok(product) => {
                tracing::info!("Job completed");
                Ok(product)
            }
            Err(e) => {
                self.mark_failed(job_id, JobStatus::ProcessingFailed, &e)
                    .await;
                Err(e)
            }
        }
    }

    pub async fn get_job(&self, job_id: JobId) -> Result<Job, PipelineError> {
        self.job_repository
            .get_by_id(job_id)
            .await?
            .ok_or(PipelineError::NotFound(job_id))
    }

    pub async fn list_jobs(
        &self,
        status: Option<JobStatus>,
        limit: Option<usize>,
    ) -> Result<Vec<JobSummary>, PipelineError> {
        let limit = limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        Ok(self.job_repository.list(status, limit).await?)
    }

    pub async fn health(&self) -> Result<(), PipelineError> {
        Ok(self.job_repository.ping().await?)
    }

    async fn run_scrape(&self, job: &Job, url: &Url) -> Result<RawContent, PipelineError> {
        let content = self.scrape_service.scrape(url).await?;

        self.job_repository
            .set_raw_content(job.id, &content)
            .await?;
        self.job_repository
            .update_status(job.id, JobStatus::Scraped, None)
            .await?;

        Ok(content)
    }

    async fn run_structuring(&self, job: &Job) -> Result<Product, PipelineError> {
        let content = job
            .raw_content
            .as_ref()
            .ok_or(PipelineError::Processing(StructuringError::EmptyContent))?;

        let product = self.structuring_service.structure(job.id, content).await?;

        self.job_repository
            .set_structured_data(job.id, &product)
            .await?;
        self.job_repository
            .update_status(job.id, JobStatus::Completed, None)
            .await?;

        Ok(product)
    }

    async fn mark_failed(&self, job_id: JobId, status: JobStatus, cause: &PipelineError) {
        let message = cause.to_string();
        tracing::warn!(job_id = %job_id, status = %status, error = %message, "Job failed");

        if let Err(e) = self
            .job_repository
            .update_status(job_id, status, Some(&message))
            .await
        {
            tracing::error!(job_id = %job_id, error = %e, "Failed to record job failure");
        }
    }
}

const ABANDONED_MESSAGE: &str = "scrape request was cancelled before the job finished";

/// Marks a freshly created job `failed` if the scrape future is dropped before it
/// reaches a recorded status, e.g. when the client disconnects mid-request.
struct AbandonedJobGuard {
    job_repository: Arc<dyn JobRepository>,
    job_id: JobId,
    armed: bool,
}

impl AbandonedJobGuard {
    fn new(job_repository: Arc<dyn JobRepository>, job_id: JobId) -> Self {
        Self {
            job_repository,
            job_id,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonedJobGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!(job_id = %self.job_id, "No runtime to record abandoned job");
            return;
        };

        let job_repository = Arc::clone(&self.job_repository);
        let job_id = self.job_id;
        tracing::warn!(job_id = %job_id, "Scrape abandoned, marking job failed");

        runtime.spawn(async move {
            if let Err(e) = job_repository
                .update_status(job_id, JobStatus::Failed, Some(ABANDONED_MESSAGE))
                .await
            {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record abandoned job");
            }
        });
    }
}
