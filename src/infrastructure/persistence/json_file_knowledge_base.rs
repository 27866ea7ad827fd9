use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use super::in_memory_knowledge_base::{merge_entries, rank_entries, summarize_sources};
use crate::application::ports::{KnowledgeBase, KnowledgeBaseError, SearchResult, SourceSummary};
use crate::domain::{Chunk, Embedding, KnowledgeEntry};

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct KnowledgeBaseFile {
    version: u32,
    updated_at: DateTime<Utc>,
    entries: Vec<KnowledgeEntry>,
}

/// Knowledge base kept in memory and written back to a JSON file after every
/// change, so answers survive a restart.
pub struct JsonFileKnowledgeBase {
    path: PathBuf,
    entries: RwLock<Vec<KnowledgeEntry>>,
}

impl JsonFileKnowledgeBase {
    /// Loads `path` if it exists; a missing file starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, KnowledgeBaseError> {
        let path = path.into();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: KnowledgeBaseFile = serde_json::from_slice(&bytes).map_err(|e| {
                    KnowledgeBaseError::LoadFailed(format!("{}: {e}", path.display()))
                })?;
                if file.version != FORMAT_VERSION {
                    return Err(KnowledgeBaseError::LoadFailed(format!(
                        "{}: unsupported format version {}",
                        path.display(),
                        file.version
                    )));
                }
                file.entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(KnowledgeBaseError::LoadFailed(format!(
                    "{}: {e}",
                    path.display()
                )));
            }
        };

        tracing::info!(path = %path.display(), entries = entries.len(), "Knowledge base opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &[KnowledgeEntry]) -> Result<(), KnowledgeBaseError> {
        let file = KnowledgeBaseFile {
            version: FORMAT_VERSION,
            updated_at: Utc::now(),
            entries: entries.to_vec(),
        };
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || write_atomically(&path, &file))
            .await
            .map_err(|e| KnowledgeBaseError::PersistFailed(e.to_string()))?
    }
}

/// Writes next to the target and renames over it, so readers never see a
/// half-written file.
fn write_atomically(path: &Path, file: &KnowledgeBaseFile) -> Result<(), KnowledgeBaseError> {
    let persist_err = |e: &dyn std::fmt::Display| {
        KnowledgeBaseError::PersistFailed(format!("{}: {e}", path.display()))
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| persist_err(&e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| persist_err(&e))?;
    serde_json::to_writer(&mut tmp, file).map_err(|e| persist_err(&e))?;
    tmp.flush().map_err(|e| persist_err(&e))?;
    tmp.persist(path).map_err(|e| persist_err(&e.error))?;
    Ok(())
}

#[async_trait]
impl KnowledgeBase for JsonFileKnowledgeBase {
    #[instrument(skip(self, chunks, embeddings), fields(path = %self.path.display(), count = chunks.len()))]
    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), KnowledgeBaseError> {
        let mut entries = self.entries.write().await;
        let mut updated = entries.clone();
        merge_entries(&mut updated, chunks, embeddings)?;
        self.persist(&updated).await?;
        *entries = updated;
        tracing::debug!(total = entries.len(), "Knowledge base persisted");
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
        let mut entries = self.entries.write().await;
        self.persist(&[]).await?;
        entries.clear();
        tracing::info!(path = %self.path.display(), "Knowledge base cleared");
        Ok(())
    }
}
