use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page content captured by the scrape step, normalized across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContent {
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub scraped_at: DateTime<Utc>,
}

impl RawContent {
    pub fn new(
        source_url: String,
        markdown: Option<String>,
        html: Option<String>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            source_url,
            markdown: markdown.filter(|m| !m.trim().is_empty()),
            html: html.filter(|h| !h.trim().is_empty()),
            metadata,
            scraped_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markdown.is_none() && self.html.is_none()
    }

    /// Text handed to the structuring model: markdown when present, HTML otherwise.
    pub fn body_text(&self) -> &str {
        self.markdown
            .as_deref()
            .or(self.html.as_deref())
            .unwrap_or_default()
    }
}
