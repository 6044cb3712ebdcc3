use std::sync::Arc;

use crate::application::services::PipelineService;

#[derive(Clone)]
pub struct AppState {
    pub pipeline_service: Arc<PipelineService>,
}

impl AppState {
    pub fn new(pipeline_service: Arc<PipelineService>) -> Self {
        Self { pipeline_service }
    }
}
