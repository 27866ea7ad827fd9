use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;
use crate::infrastructure::llm::bedrock_invoke_url;
use crate::infrastructure::text_processing::clean_text;

/// Titan text embeddings through the Bedrock runtime. Titan takes one input
/// per request, so batches are sent sequentially.
pub struct BedrockEmbedder {
    client: Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanEmbeddingRequest {
    input_text: String,
}

#[derive(Deserialize)]
struct TitanEmbeddingResponse {
    embedding: Vec<f32>,
}

impl BedrockEmbedder {
    pub fn new(
        base_url: String,
        api_key: String,
        model_id: String,
        timeout: Duration,
    ) -> Result<Self, EmbedderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbedderError::ApiRequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model_id,
        })
    }
}

#[async_trait]
impl Embedder for BedrockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        let request_body = TitanEmbeddingRequest {
            input_text: clean_text(text),
        };

        let response = self
            .client
            .post(bedrock_invoke_url(&self.base_url, &self.model_id))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmbedderError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbedderError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedderError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let embedding_response: TitanEmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedderError::InvalidResponse(e.to_string()))?;

        if embedding_response.embedding.is_empty() {
            return Err(EmbedderError::InvalidResponse("empty embedding".to_string()));
        }

        tracing::debug!(
            dimensions = embedding_response.embedding.len(),
            "Generated embedding"
        );
        Ok(Embedding::new(embedding_response.embedding))
    }
}
