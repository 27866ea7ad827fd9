use std::sync::Arc;

use crate::application::ports::{DocumentSource, DocumentSourceError};
use crate::application::services::{IngestedDocument, IngestionError, IngestionService};

/// Pulls a wiki page by title and feeds its text through ingestion.
pub struct ConfluenceIngestion {
    source: Arc<dyn DocumentSource>,
    ingestion: Arc<IngestionService>,
}

impl ConfluenceIngestion {
    pub fn new(source: Arc<dyn DocumentSource>, ingestion: Arc<IngestionService>) -> Self {
        Self { source, ingestion }
    }

    #[tracing::instrument(skip(self))]
    pub async fn load_page(
        &self,
        space_key: &str,
        page_title: &str,
    ) -> Result<IngestedDocument, ConfluenceIngestionError> {
        let page_id = self
            .source
            .find_page_id(space_key, page_title)
            .await?
            .ok_or_else(|| ConfluenceIngestionError::PageNotFound {
                space_key: space_key.to_string(),
                page_title: page_title.to_string(),
            })?;

        tracing::info!(page_id = %page_id, "Found page");

        let text = self.source.fetch_page_text(&page_id).await?;
        if text.trim().is_empty() {
            return Err(ConfluenceIngestionError::EmptyPage(page_id));
        }

        let document = self.ingestion.ingest_text(text, page_title).await?;
        Ok(document)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfluenceIngestionError {
    #[error("page '{page_title}' not found in space '{space_key}'")]
    PageNotFound {
        space_key: String,
        page_title: String,
    },
    #[error("page {0} has no text content")]
    EmptyPage(String),
    #[error("confluence: {0}")]
    Source(#[from] DocumentSourceError),
    #[error("ingestion: {0}")]
    Ingestion(#[from] IngestionError),
}
