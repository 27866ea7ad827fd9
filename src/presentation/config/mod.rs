mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, ChunkingStrategy, ConfluenceSettings, EmbeddingProvider,
    EmbeddingsSettings, IngestionSettings, KnowledgeBaseBackend, KnowledgeBaseSettings,
    LlmProvider, LlmSettings, LoggingSettings, RetrievalSettings, ServerSettings, Settings,
};
