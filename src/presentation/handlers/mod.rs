mod error_response;
mod health;
mod jobs;
mod process;
mod scrape;

pub use error_response::{ErrorResponse, status_for};
pub use health::health_handler;
pub use jobs::{job_handler, list_jobs_handler};
pub use process::process_handler;
pub use scrape::scrape_handler;
