use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::Embedder;
use crate::infrastructure::llm::{OPENAI_BASE_URL, bedrock_runtime_url};
use crate::presentation::config::{EmbeddingProvider, EmbeddingsSettings};

use super::{BedrockEmbedder, LocalCandleEmbedder, MockEmbedder, OpenAiEmbedder};

pub const BEDROCK_API_KEY_VAR: &str = "AWS_BEARER_TOKEN_BEDROCK";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

pub struct EmbedderFactory;

#[derive(Debug, thiserror::Error)]
pub enum EmbedderFactoryError {
    #[error("missing API key: set embeddings.api_key or {0}")]
    MissingApiKey(&'static str),
    #[error("model initialization failed: {0}")]
    InitializationFailed(String),
}

/// Configured key, else the provider's conventional environment variable.
pub fn resolve_api_key(configured: Option<&str>, env_var: &'static str) -> Option<String> {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|k| !k.trim().is_empty())
}

impl EmbedderFactory {
    pub fn create(settings: &EmbeddingsSettings) -> Result<Arc<dyn Embedder>, EmbedderFactoryError> {
        let timeout = Duration::from_secs(settings.timeout_secs);

        match settings.provider {
            EmbeddingProvider::Bedrock => {
                let key = resolve_api_key(settings.api_key.as_deref(), BEDROCK_API_KEY_VAR)
                    .ok_or(EmbedderFactoryError::MissingApiKey(BEDROCK_API_KEY_VAR))?;
                let base_url = settings
                    .base_url
                    .clone()
                    .unwrap_or_else(|| bedrock_runtime_url(&settings.region));
                tracing::info!(model = %settings.model, base_url = %base_url, "Using Bedrock embeddings");
                let embedder =
                    BedrockEmbedder::new(base_url, key, settings.model.clone(), timeout)
                        .map_err(|e| EmbedderFactoryError::InitializationFailed(e.to_string()))?;
                Ok(Arc::new(embedder))
            }
            EmbeddingProvider::OpenAi => {
                let key = resolve_api_key(settings.api_key.as_deref(), OPENAI_API_KEY_VAR)
                    .ok_or(EmbedderFactoryError::MissingApiKey(OPENAI_API_KEY_VAR))?;
                let base_url = settings
                    .base_url
                    .clone()
                    .unwrap_or_else(|| OPENAI_BASE_URL.to_string());
                tracing::info!(model = %settings.model, "Using OpenAI-compatible embeddings");
                let embedder = OpenAiEmbedder::new(base_url, key, settings.model.clone(), timeout)
                    .map_err(|e| EmbedderFactoryError::InitializationFailed(e.to_string()))?;
                Ok(Arc::new(embedder))
            }
            EmbeddingProvider::Local => {
                tracing::info!(model = %settings.model, "Using local embedding model");
                let embedder = LocalCandleEmbedder::new(&settings.model)
                    .map_err(|e| EmbedderFactoryError::InitializationFailed(e.to_string()))?;
                Ok(Arc::new(embedder))
            }
            EmbeddingProvider::Mock => {
                tracing::warn!("Using mock embeddings");
                Ok(Arc::new(MockEmbedder))
            }
        }
    }
}
