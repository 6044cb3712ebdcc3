mod anthropic_client;
mod mock_llm_client;

pub use anthropic_client::AnthropicClient;
pub use mock_llm_client::MockLlmClient;
