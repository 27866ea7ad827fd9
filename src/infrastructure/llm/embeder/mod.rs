mod bedrock_embedder;
mod embedder_factory;
mod local_candle_embedder;
mod mock_embedder;
mod openai_embedder;

pub use bedrock_embedder::BedrockEmbedder;
pub use embedder_factory::{
    BEDROCK_API_KEY_VAR, EmbedderFactory, EmbedderFactoryError, OPENAI_API_KEY_VAR,
    resolve_api_key,
};
pub use local_candle_embedder::{DEFAULT_LOCAL_MODEL, LocalCandleEmbedder};
pub use mock_embedder::{MOCK_EMBEDDING_DIMENSIONS, MockEmbedder};
pub use openai_embedder::OpenAiEmbedder;
