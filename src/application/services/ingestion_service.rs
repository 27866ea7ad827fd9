use std::sync::Arc;

use serde::Serialize;

use crate::application::ports::{
    Embedder, ExtractedText, FileLoader, FileLoaderError, KnowledgeBase, KnowledgeBaseError,
    TextSplitter, TextSplitterError,
};
use crate::domain::{Chunk, ContentType, Document, DocumentId, Embedding, KnowledgeEntry};

pub struct IngestionService {
    file_loader: Arc<dyn FileLoader>,
    embedder: Arc<dyn Embedder>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    text_splitter: Arc<dyn TextSplitter>,
    max_file_size_bytes: u64,
}

/// Counts for one ingested document. Chunks whose embedding failed are
/// skipped without failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub document_id: DocumentId,
    pub source: String,
    pub chunks_total: usize,
    pub chunks_stored: usize,
    pub chunks_skipped: usize,
}

/// Everything produced while ingesting a document.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub report: IngestionReport,
    pub text: String,
    pub entries: Vec<KnowledgeEntry>,
}

impl IngestionService {
    pub fn new(
        file_loader: Arc<dyn FileLoader>,
        embedder: Arc<dyn Embedder>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        text_splitter: Arc<dyn TextSplitter>,
        max_file_size_bytes: u64,
    ) -> Self {
        Self {
            file_loader,
            embedder,
            knowledge_base,
            text_splitter,
            max_file_size_bytes,
        }
    }

    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn ingest(
        &self,
        data: &[u8],
        filename: String,
        content_type: ContentType,
    ) -> Result<IngestedDocument, IngestionError> {
        let size_bytes = data.len() as u64;
        if size_bytes > self.max_file_size_bytes {
            return Err(IngestionError::FileTooLarge {
                size_bytes,
                limit_bytes: self.max_file_size_bytes,
            });
        }

        let document = Document::new(filename, content_type, size_bytes);

        let extracted = self
            .file_loader
            .extract(data, &document)
            .await
            .map_err(IngestionError::FileLoading)?;

        self.ingest_extracted(document.id, &document.filename, extracted)
            .await
    }

    /// Ingests text that was already extracted elsewhere, such as a wiki page.
    pub async fn ingest_text(
        &self,
        text: String,
        source: &str,
    ) -> Result<IngestedDocument, IngestionError> {
        self.ingest_extracted(DocumentId::new(), source, ExtractedText::plain(text))
            .await
    }

    async fn ingest_extracted(
        &self,
        document_id: DocumentId,
        source: &str,
        extracted: ExtractedText,
    ) -> Result<IngestedDocument, IngestionError> {
        let chunks: Vec<Chunk> = self
            .text_splitter
            .split(&extracted.text, document_id, source)
            .await
            .map_err(IngestionError::Splitting)?
            .into_iter()
            .map(|chunk| match extracted.page_at(chunk.offset) {
                Some(page) => chunk.with_page(page),
                None => chunk,
            })
            .collect();
        let text = extracted.text;

        let chunks_total = chunks.len();
        tracing::debug!(source, chunks_total, "Text split into chunks");

        if chunks.is_empty() {
            tracing::warn!(source, "No chunks produced");
            return Ok(IngestedDocument {
                report: IngestionReport {
                    document_id,
                    source: source.to_string(),
                    chunks_total: 0,
                    chunks_stored: 0,
                    chunks_skipped: 0,
                },
                text,
                entries: Vec::new(),
            });
        }

        let (kept_chunks, embeddings) = self.embed_chunks(chunks).await;

        if !kept_chunks.is_empty() {
            self.knowledge_base
                .upsert(&kept_chunks, &embeddings)
                .await
                .map_err(IngestionError::Storage)?;
        }

        let chunks_stored = kept_chunks.len();
        let report = IngestionReport {
            document_id,
            source: source.to_string(),
            chunks_total,
            chunks_stored,
            chunks_skipped: chunks_total - chunks_stored,
        };

        tracing::info!(
            document_id = %document_id.as_uuid(),
            source,
            chunks_stored,
            chunks_skipped = report.chunks_skipped,
            "Document ingested"
        );

        let entries = kept_chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| KnowledgeEntry::new(chunk, embedding))
            .collect();

        Ok(IngestedDocument {
            report,
            text,
            entries,
        })
    }

    /// Tries one batch call first. If the batch fails or comes back short,
    /// falls back to one call per chunk and drops the chunks that fail.
    async fn embed_chunks(&self, chunks: Vec<Chunk>) -> (Vec<Chunk>, Vec<Embedding>) {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

        match self.embedder.embed_batch(&texts).await {
            Ok(embeddings) if embeddings.len() == chunks.len() => return (chunks, embeddings),
            Ok(embeddings) => tracing::warn!(
                expected = chunks.len(),
                received = embeddings.len(),
                "Batch embedding returned wrong count, embedding chunks one by one"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "Batch embedding failed, embedding chunks one by one"
            ),
        }

        let mut kept = Vec::with_capacity(chunks.len());
        let mut embeddings = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.into_iter().enumerate() {
            match self.embedder.embed(&chunk.text).await {
                Ok(embedding) => {
                    kept.push(chunk);
                    embeddings.push(embedding);
                }
                Err(e) => {
                    tracing::error!(chunk_index = index, error = %e, "Failed to embed chunk, skipping");
                }
            }
        }

        (kept, embeddings)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("file of {size_bytes} bytes exceeds the {limit_bytes} byte limit")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },
    #[error("file loading: {0}")]
    FileLoading(#[from] FileLoaderError),
    #[error("text splitting: {0}")]
    Splitting(#[from] TextSplitterError),
    #[error("storage: {0}")]
    Storage(#[from] KnowledgeBaseError),
}
