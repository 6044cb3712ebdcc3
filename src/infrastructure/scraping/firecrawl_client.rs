use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Scraper, ScraperError};
use crate::domain::RawContent;
use crate::infrastructure::observability::sanitize_for_log;
use crate::presentation::config::ScraperSettings;

/// Firecrawl `/v1/scrape` client.
pub struct FirecrawlClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 2],
    only_main_content: bool,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

impl FirecrawlClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::ApiRequestFailed(format!("client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/scrape", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    pub fn from_settings(settings: &ScraperSettings) -> Result<Self, ScraperError> {
        Self::new(
            &settings.base_url,
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

fn map_transport_error(e: reqwest::Error) -> ScraperError {
    if e.is_timeout() {
        ScraperError::Timeout
    } else if e.is_decode() {
        ScraperError::InvalidResponse(e.to_string())
    } else {
        ScraperError::ApiRequestFailed(e.to_string())
    }
}

#[async_trait]
impl Scraper for FirecrawlClient {
    async fn scrape(&self, url: &str) -> Result<RawContent, ScraperError> {
        let request_body = ScrapeRequest {
            url,
            formats: ["markdown", "html"],
            only_main_content: true,
        };

        tracing::debug!(endpoint = %self.endpoint, url = %url, "Requesting scrape");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScraperError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScraperError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status,
                sanitize_for_log(&body)
            )));
        }

        let scrape_response: ScrapeResponse =
            response.json().await.map_err(map_transport_error)?;

        if !scrape_response.success {
            return Err(ScraperError::InvalidResponse(
                scrape_response
                    .error
                    .unwrap_or_else(|| "provider reported failure".to_string()),
            ));
        }

        let data = scrape_response
            .data
            .ok_or_else(|| ScraperError::InvalidResponse("missing data".to_string()))?;

        let content = RawContent::new(
            url.to_string(),
            data.markdown,
            data.html,
            data.metadata
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
        );

        if content.is_empty() {
            return Err(ScraperError::InvalidResponse(
                "no markdown or html in response".to_string(),
            ));
        }

        tracing::info!(
            url = %url,
            markdown_chars = content.markdown.as_ref().map_or(0, String::len),
            "Scrape completed"
        );

        Ok(content)
    }
}
