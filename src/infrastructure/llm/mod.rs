mod bedrock_client;
pub mod embeder;
mod llm_client_factory;
mod mock_llm_client;
mod openai_client;

pub use bedrock_client::{
    BedrockLlmClient, BedrockModelFamily, bedrock_invoke_url, bedrock_runtime_url,
};
pub use embeder::{
    BedrockEmbedder, EmbedderFactory, EmbedderFactoryError, LocalCandleEmbedder, MockEmbedder,
    OpenAiEmbedder,
};
pub use llm_client_factory::{LlmClientFactory, LlmClientFactoryError};
pub use mock_llm_client::MockLlmClient;
pub use openai_client::{OPENAI_BASE_URL, OpenAiClient};
