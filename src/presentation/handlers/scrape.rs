use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::error_response::pipeline_error_response;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct ScrapeResponse {
    pub job_id: String,
    pub status: String,
    pub message: String,
}

#[tracing::instrument(skip(state, request), fields(url = %request.url))]
pub async fn scrape_handler(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> impl IntoResponse {
    match state.pipeline_service.scrape(&request.url).await {
        Ok(job) => (
            StatusCode::OK,
            Json(ScrapeResponse {
                job_id: job.id.to_string(),
                status: job.status.as_str().to_string(),
                message: "Data scraped successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => pipeline_error_response(e),
    }
}
