use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::error_response::{error_response, pipeline_error_response};
use crate::domain::{JobId, JobStatus, Product};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub job_id: String,
}

#[derive(Serialize)]
pub struct ProcessResponse {
    pub job_id: String,
    pub status: String,
    pub data: Product,
}

#[tracing::instrument(skip(state, request), fields(job_id = %request.job_id))]
pub async fn process_handler(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> impl IntoResponse {
    let job_id: JobId = match request.job_id.parse() {
        Ok(id) => id,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    match state.pipeline_service.process(job_id).await {
        Ok(product) => (
            StatusCode::OK,
            Json(ProcessResponse {
                job_id: job_id.to_string(),
                status: JobStatus::Completed.as_str().to_string(),
                data: product,
            }),
        )
            .into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
