use crate::application::ports::{LlmClient, LlmClientError};

/// Offline stand-in that echoes how much prompt it was given.
pub struct MockLlmClient;

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        Ok(format!(
            "Mock answer (prompt of {} characters).",
            prompt.chars().count()
        ))
    }
}
