use async_trait::async_trait;

use crate::domain::RawContent;

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<RawContent, ScraperError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("request timed out")]
    Timeout,
}
