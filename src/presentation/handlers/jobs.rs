use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::error_response::{error_response, pipeline_error_response};
use crate::domain::{Job, JobId, JobStatus, JobSummary, Product, RawContent};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobResponse {
    pub job_id: String,
    pub url: String,
    pub status: JobStatus,
    pub raw_content: Option<RawContent>,
    pub structured_data: Option<Product>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id.to_string(),
            url: job.url,
            status: job.status,
            raw_content: job.raw_content,
            structured_data: job.structured_data,
            error_message: job.error_message,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct JobSummaryResponse {
    pub job_id: String,
    pub url: String,
    pub status: JobStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JobSummary> for JobSummaryResponse {
    fn from(summary: JobSummary) -> Self {
        Self {
            job_id: summary.id.to_string(),
            url: summary.url,
            status: summary.status,
            created_at: summary.created_at.to_rfc3339(),
            updated_at: summary.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummaryResponse>,
}

#[derive(Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<String>,
    pub limit: Option<usize>,
}

#[tracing::instrument(skip(state))]
pub async fn job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let job_id: JobId = match job_id.parse() {
        Ok(id) => id,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    match state.pipeline_service.get_job(job_id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        Err(e) => pipeline_error_response(e),
    }
}

#[tracing::instrument(skip(state, query))]
pub async fn list_jobs_handler(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<JobStatus>() {
            Ok(status) => Some(status),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
        },
    };

    match state.pipeline_service.list_jobs(status, query.limit).await {
        Ok(jobs) => (
            StatusCode::OK,
            Json(JobListResponse {
                jobs: jobs.into_iter().map(JobSummaryResponse::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
