mod pipeline_error;
mod pipeline_service;
mod rate_gate;
mod scrape_service;
mod structuring_service;

pub use pipeline_error::PipelineError;
pub use pipeline_service::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, PipelineService};
pub use rate_gate::{RateGate, RateGateConfig};
pub use scrape_service::{ScrapeError, ScrapeService};
pub use structuring_service::{StructuringError, StructuringService};
