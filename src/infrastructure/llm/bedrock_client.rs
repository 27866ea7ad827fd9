use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError};

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

pub fn bedrock_runtime_url(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

/// `{base}/model/{model_id}/invoke`, with the `:` of versioned model ids escaped.
pub fn bedrock_invoke_url(base_url: &str, model_id: &str) -> String {
    format!(
        "{}/model/{}/invoke",
        base_url.trim_end_matches('/'),
        model_id.replace(':', "%3A")
    )
}

/// Request/response dialect of a Bedrock model, picked from its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BedrockModelFamily {
    Anthropic,
    Titan,
}

impl BedrockModelFamily {
    pub fn from_model_id(model_id: &str) -> Option<Self> {
        if model_id.contains("anthropic.") {
            Some(Self::Anthropic)
        } else if model_id.contains("amazon.titan") {
            Some(Self::Titan)
        } else {
            None
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    anthropic_version: &'static str,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: Vec<AnthropicContent<'a>>,
}

#[derive(Serialize)]
struct AnthropicContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicResponseBlock>,
}

#[derive(Deserialize)]
struct AnthropicResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanRequest<'a> {
    input_text: &'a str,
    text_generation_config: TitanGenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanGenerationConfig {
    max_token_count: usize,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct TitanResponse {
    results: Vec<TitanResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitanResult {
    output_text: String,
}

/// Text generation through the Bedrock runtime `invoke` endpoint,
/// authenticated with a Bedrock API key.
pub struct BedrockLlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model_id: String,
    family: BedrockModelFamily,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
}

impl BedrockLlmClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model_id: String,
        timeout: Duration,
    ) -> Result<Self, LlmClientError> {
        let family = BedrockModelFamily::from_model_id(&model_id).ok_or_else(|| {
            LlmClientError::ApiRequestFailed(format!("unsupported bedrock model: {model_id}"))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model_id,
            family,
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
        })
    }

    pub fn with_sampling(mut self, max_tokens: usize, temperature: f32, top_p: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    fn request_body(&self, prompt: &str) -> Result<serde_json::Value, LlmClientError> {
        let body = match self.family {
            BedrockModelFamily::Anthropic => serde_json::to_value(AnthropicRequest {
                anthropic_version: ANTHROPIC_VERSION,
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                top_p: self.top_p,
                messages: vec![AnthropicMessage {
                    role: "user",
                    content: vec![AnthropicContent {
                        kind: "text",
                        text: prompt,
                    }],
                }],
            }),
            BedrockModelFamily::Titan => serde_json::to_value(TitanRequest {
                input_text: prompt,
                text_generation_config: TitanGenerationConfig {
                    max_token_count: self.max_tokens,
                    temperature: self.temperature,
                    top_p: self.top_p,
                },
            }),
        };
        body.map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))
    }

    fn parse_response(&self, body: &str) -> Result<String, LlmClientError> {
        match self.family {
            BedrockModelFamily::Anthropic => {
                let response: AnthropicResponse = serde_json::from_str(body)
                    .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;
                Ok(response
                    .content
                    .into_iter()
                    .filter_map(|block| block.text)
                    .collect::<String>())
            }
            BedrockModelFamily::Titan => {
                let response: TitanResponse = serde_json::from_str(body)
                    .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;
                response
                    .results
                    .into_iter()
                    .next()
                    .map(|r| r.output_text)
                    .ok_or_else(|| LlmClientError::InvalidResponse("empty results".to_string()))
            }
        }
    }
}

#[async_trait]
impl LlmClient for BedrockLlmClient {
    #[tracing::instrument(skip(self, prompt), fields(model = %self.model_id))]
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        let body = self.request_body(prompt)?;

        let response = self
            .client
            .post(bedrock_invoke_url(&self.base_url, &self.model_id))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        let answer = self.parse_response(&text)?;
        tracing::info!(chars = answer.len(), "Bedrock completion received");
        Ok(answer)
    }
}
