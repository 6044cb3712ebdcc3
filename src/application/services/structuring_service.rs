use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError};
use crate::application::services::RateGate;
use crate::domain::{JobId, Product, ProductDraft, ProductValidationError, RawContent};

const STRUCTURING_PROMPT: &str = r#"You extract product data from scraped web pages.
Reply with a single JSON object and nothing else, using exactly these keys:
{
  "id": string,
  "name": string,
  "description": string,
  "specifications": {
    "color": string,
    "dimensions": string,
    "wattage": string,
    "type": string,
    "material": string
  },
  "category": string,
  "price": number,
  "sku": string,
  "image_url": string
}
Use an empty string for any text field the page does not state and omit "price" when
no price is shown. Do not invent values."#;

/// Structure step: turns scraped content into a [`Product`] through a rate-gated
/// language model call.
pub struct StructuringService {
    llm_client: Arc<dyn LlmClient>,
    rate_gate: Arc<RateGate>,
}

impl StructuringService {
    pub fn new(llm_client: Arc<dyn LlmClient>, rate_gate: Arc<RateGate>) -> Self {
        Self {
            llm_client,
            rate_gate,
        }
    }

    #[tracing::instrument(skip(self, content), fields(job_id = %job_id))]
    pub async fn structure(
        &self,
        job_id: JobId,
        content: &RawContent,
    ) -> Result<Product, StructuringError> {
        if content.is_empty() {
            return Err(StructuringError::EmptyContent);
        }

        let context = build_context(content);
        let cost = self
            .rate_gate
            .estimate_cost(STRUCTURING_PROMPT)
            .saturating_add(self.rate_gate.estimate_cost(&context));

        self.admit(cost).await?;

        let reply = self
            .llm_client
            .complete(STRUCTURING_PROMPT, &context)
            .await
            .map_err(|e| match e {
                LlmClientError::RateLimited => StructuringError::RateLimited {
                    tokens: cost,
                    reason: "provider rejected the request".to_string(),
                },
                other => StructuringError::Completion(other),
            })?;

        let draft = parse_draft(&reply)?;
        let product = Product::from_draft(draft, &job_id.to_string())?;

        tracing::info!(product_name = %product.name, price = product.price, "Product structured");
        Ok(product)
    }

    /// One wait, one attempt. Losing the race to a concurrent caller after waiting is
    /// reported as rate-limited instead of waiting again.
    async fn admit(&self, tokens: u64) -> Result<(), StructuringError> {
        if tokens > self.rate_gate.capacity() {
            return Err(StructuringError::RateLimited {
                tokens,
                reason: format!(
                    "request exceeds gate capacity of {}",
                    self.rate_gate.capacity()
                ),
            });
        }

        let wait = self.rate_gate.wait_time(tokens);
        if !wait.is_zero() {
            tracing::info!(tokens, wait_ms = wait.as_millis() as u64, "Waiting for rate gate");
            tokio::time::sleep(wait).await;
        }

        if self.rate_gate.try_acquire(tokens) {
            Ok(())
        } else {
            tracing::warn!(tokens, "Rate gate still exhausted after waiting");
            Err(StructuringError::RateLimited {
                tokens,
                reason: "token budget exhausted".to_string(),
            })
        }
    }
}

fn build_context(content: &RawContent) -> String {
    let mut context = format!("Source URL: {}\n", content.source_url);

    if content.metadata.as_object().is_some_and(|m| !m.is_empty()) {
        context.push_str("\nPage metadata:\n");
        context.push_str(&content.metadata.to_string());
        context.push('\n');
    }

    context.push_str("\nPage content:\n");
    context.push_str(content.body_text());
    context
}

/// Reads the first complete JSON object in a model reply, ignoring any prose or
/// markdown fences around it.
fn parse_draft(reply: &str) -> Result<ProductDraft, StructuringError> {
    let start = reply.find('{').ok_or_else(|| {
        StructuringError::MalformedOutput("reply contains no JSON object".to_string())
    })?;

    let mut values = serde_json::Deserializer::from_str(&reply[start..]).into_iter::<ProductDraft>();

    match values.next() {
        Some(Ok(draft)) => Ok(draft),
        Some(Err(e)) => Err(StructuringError::MalformedOutput(e.to_string())),
        None => Err(StructuringError::MalformedOutput(
            "reply contains no JSON object".to_string(),
        )),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StructuringError {
    #[error("job has no scraped content")]
    EmptyContent,
    #[error("rate limited ({tokens} tokens): {reason}")]
    RateLimited { tokens: u64, reason: String },
    #[error("completion: {0}")]
    Completion(LlmClientError),
    #[error("malformed model output: {0}")]
    MalformedOutput(String),
    #[error("invalid product: {0}")]
    Invalid(#[from] ProductValidationError),
}
