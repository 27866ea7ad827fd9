use async_trait::async_trait;
use serde::Serialize;

use super::{KnowledgeBaseError, SearchResult};
use crate::domain::{Chunk, Embedding};

/// Collection of chunk/embedding pairs used for retrieval.
///
/// Entries keep insertion order. Upserting a chunk whose id is already stored
/// replaces that entry in place; any other chunk is appended.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), KnowledgeBaseError>;

    /// Linear scan over every entry. Results are ordered by descending cosine
    /// similarity; equal scores keep insertion order.
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, KnowledgeBaseError>;

    async fn len(&self) -> Result<usize, KnowledgeBaseError>;

    async fn is_empty(&self) -> Result<bool, KnowledgeBaseError> {
        Ok(self.len().await? == 0)
    }

    async fn sources(&self) -> Result<Vec<SourceSummary>, KnowledgeBaseError>;

    async fn clear(&self) -> Result<(), KnowledgeBaseError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: String,
    pub chunk_count: usize,
}
