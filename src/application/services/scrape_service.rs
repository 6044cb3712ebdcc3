use std::sync::Arc;

use url::Url;

use crate::application::ports::{Scraper, ScraperError};
use crate::domain::RawContent;

/// Scrape step: one call to the scraping provider per request, no retries.
pub struct ScrapeService {
    scraper: Arc<dyn Scraper>,
}

impl ScrapeService {
    pub fn new(scraper: Arc<dyn Scraper>) -> Self {
        Self { scraper }
    }

    /// Accepts absolute `http`/`https` URLs with a host.
    pub fn validate_url(&self, raw: &str) -> Result<Url, ScrapeError> {
        let url = Url::parse(raw.trim()).map_err(|e| ScrapeError::InvalidUrl(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScrapeError::InvalidUrl(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(ScrapeError::InvalidUrl("missing host".to_string()));
        }

        Ok(url)
    }

    #[tracing::instrument(skip(self), fields(url = %url))]
    pub async fn scrape(&self, url: &Url) -> Result<RawContent, ScrapeError> {
        let content = self.scraper.scrape(url.as_str()).await?;

        if content.is_empty() {
            return Err(ScrapeError::EmptyContent);
        }

        tracing::debug!(
            markdown_chars = content.markdown.as_ref().map_or(0, String::len),
            html_chars = content.html.as_ref().map_or(0, String::len),
            "Scrape returned content"
        );

        Ok(content)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("scraping provider returned no content")]
    EmptyContent,
    #[error("scraping provider: {0}")]
    Provider(#[from] ScraperError),
}
