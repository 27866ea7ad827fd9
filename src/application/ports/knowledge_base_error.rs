#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("chunk and embedding counts differ: {chunks} chunks, {embeddings} embeddings")]
    LengthMismatch { chunks: usize, embeddings: usize },
    #[error("failed to load knowledge base: {0}")]
    LoadFailed(String),
    #[error("failed to persist knowledge base: {0}")]
    PersistFailed(String),
}
