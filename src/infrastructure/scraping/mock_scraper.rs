use crate::application::ports::{Scraper, ScraperError};
use crate::domain::RawContent;

/// Returns canned page content, or fails every call when built with [`MockScraper::failing`].
pub struct MockScraper {
    markdown: Option<String>,
}

impl MockScraper {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: Some(markdown.into()),
        }
    }

    pub fn failing() -> Self {
        Self { markdown: None }
    }
}

impl Default for MockScraper {
    fn default() -> Self {
        Self::new("# Mock Lamp\n\nA white desk lamp. Price: $19.99")
    }
}

#[async_trait::async_trait]
impl Scraper for MockScraper {
    async fn scrape(&self, url: &str) -> Result<RawContent, ScraperError> {
        match &self.markdown {
            Some(markdown) => Ok(RawContent::new(
                url.to_string(),
                Some(markdown.clone()),
                None,
                serde_json::json!({ "title": "Mock page" }),
            )),
            None => Err(ScraperError::ApiRequestFailed(
                "HTTP 502 Bad Gateway: mock failure".to_string(),
            )),
        }
    }
}
