use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::application::ports::{KnowledgeBase, KnowledgeBaseError, SearchResult, SourceSummary};
use crate::domain::{Chunk, Embedding, KnowledgeEntry};

/// Process-local knowledge base searched by brute-force cosine similarity.
#[derive(Default)]
pub struct InMemoryKnowledgeBase {
    entries: RwLock<Vec<KnowledgeEntry>>,
}

impl InMemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Copy of every entry in insertion order.
    pub async fn snapshot(&self) -> Vec<KnowledgeEntry> {
        self.entries.read().await.clone()
    }
}

pub(crate) fn merge_entries(
    entries: &mut Vec<KnowledgeEntry>,
    chunks: &[Chunk],
    embeddings: &[Embedding],
) -> Result<(), KnowledgeBaseError> {
    if chunks.len() != embeddings.len() {
        return Err(KnowledgeBaseError::LengthMismatch {
            chunks: chunks.len(),
            embeddings: embeddings.len(),
        });
    }

    for (chunk, embedding) in chunks.iter().zip(embeddings) {
        let entry = KnowledgeEntry::new(chunk.clone(), embedding.clone());
        match entries.iter_mut().find(|e| e.chunk.id == chunk.id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    Ok(())
}

pub(crate) fn rank_entries(
    entries: &[KnowledgeEntry],
    query: &Embedding,
    top_k: usize,
) -> Vec<SearchResult> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<SearchResult> = entries
        .iter()
        .map(|entry| SearchResult {
            chunk: entry.chunk.clone(),
            score: query.cosine_similarity(&entry.embedding),
        })
        .collect();

    // sort_by is stable: ties stay in insertion order
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);
    scored
}

pub(crate) fn summarize_sources(entries: &[KnowledgeEntry]) -> Vec<SourceSummary> {
    let mut summaries: Vec<SourceSummary> = Vec::new();
    for entry in entries {
        match summaries.iter_mut().find(|s| s.source == entry.chunk.source) {
            Some(summary) => summary.chunk_count += 1,
            None => summaries.push(SourceSummary {
                source: entry.chunk.source.clone(),
                chunk_count: 1,
            }),
        }
    }
    summaries
}

#[async_trait]
impl KnowledgeBase for InMemoryKnowledgeBase {
    #[instrument(skip(self, chunks, embeddings), fields(count = chunks.len()))]
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), KnowledgeBaseError> {
        let mut entries = self.entries.write().await;
        merge_entries(&mut entries, chunks, embeddings)?;
        tracing::debug!(total = entries.len(), "Entries upserted");
        Ok(())
    }

    #[instrument(skip(self, embedding))]
    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, KnowledgeBaseError> {
        let entries = self.entries.read().await;
        Ok(rank_entries(&entries, embedding, top_k))
    }

    async fn len(&self) -> Result<usize, KnowledgeBaseError> {
        Ok(self.entries.read().await.len())
    }

    async fn sources(&self) -> Result<Vec<SourceSummary>, KnowledgeBaseError> {
        Ok(summarize_sources(&self.entries.read().await))
    }

    async fn clear(&self) -> Result<(), KnowledgeBaseError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
