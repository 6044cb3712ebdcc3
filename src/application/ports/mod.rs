mod job_repository;
mod llm_client;
mod repository_error;
mod scraper;

pub use job_repository::JobRepository;
pub use llm_client::{LlmClient, LlmClientError};
pub use repository_error::RepositoryError;
pub use scraper::{Scraper, ScraperError};
