use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::LlmClient;
use crate::presentation::config::{LlmProvider, LlmSettings};

use super::embeder::{BEDROCK_API_KEY_VAR, OPENAI_API_KEY_VAR, resolve_api_key};
use super::{BedrockLlmClient, MockLlmClient, OPENAI_BASE_URL, OpenAiClient, bedrock_runtime_url};

pub struct LlmClientFactory;

#[derive(Debug, thiserror::Error)]
pub enum LlmClientFactoryError {
    #[error("missing API key: set llm.api_key or {0}")]
    MissingApiKey(&'static str),
    #[error("client initialization failed: {0}")]
    InitializationFailed(String),
}

impl LlmClientFactory {
    pub fn create(settings: &LlmSettings) -> Result<Arc<dyn LlmClient>, LlmClientFactoryError> {
        let timeout = Duration::from_secs(settings.timeout_secs);

        match settings.provider {
            LlmProvider::Bedrock => {
                let key = resolve_api_key(settings.api_key.as_deref(), BEDROCK_API_KEY_VAR)
                    .ok_or(LlmClientFactoryError::MissingApiKey(BEDROCK_API_KEY_VAR))?;
                let base_url = settings
                    .base_url
                    .clone()
                    .unwrap_or_else(|| bedrock_runtime_url(&settings.region));
                tracing::info!(model = %settings.model, base_url = %base_url, "Using Bedrock text generation");
                let client = BedrockLlmClient::new(base_url, key, settings.model.clone(), timeout)
                    .map_err(|e| LlmClientFactoryError::InitializationFailed(e.to_string()))?
                    .with_sampling(settings.max_tokens, settings.temperature, settings.top_p);
                Ok(Arc::new(client))
            }
            LlmProvider::OpenAi => {
                let key = resolve_api_key(settings.api_key.as_deref(), OPENAI_API_KEY_VAR)
                    .ok_or(LlmClientFactoryError::MissingApiKey(OPENAI_API_KEY_VAR))?;
                let base_url = settings
                    .base_url
                    .clone()
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string());
                tracing::info!(model = %settings.model, "Using OpenAI-compatible text generation");
                let client = OpenAiClient::new(base_url, key, settings.model.clone(), timeout)
                    .map_err(|e| LlmClientFactoryError::InitializationFailed(e.to_string()))?
                    .with_sampling(settings.max_tokens, settings.temperature);
                Ok(Arc::new(client))
            }
            LlmProvider::Mock => {
                tracing::warn!("Using mock text generation");
                Ok(Arc::new(MockLlmClient))
            }
        }
    }
}
