use std::sync::Mutex;

use crate::application::ports::{LlmClient, LlmClientError};

/// Replies with a fixed product JSON document and records the contexts it was given.
pub struct MockLlmClient {
    reply: String,
    contexts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.contexts.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new(
            r#"{"id": "mock-1", "name": "Mock Lamp", "specifications": {"color": "white"}, "price": 19.99}"#,
        )
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str, context: &str) -> Result<String, LlmClientError> {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(context.to_string());
        }
        Ok(self.reply.clone())
    }
}
