use std::sync::Arc;

use crate::application::ports::KnowledgeBase;
use crate::application::services::{ConfluenceIngestion, IngestionService, RetrievalService};

#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<IngestionService>,
    pub retrieval_service: Arc<RetrievalService>,
    /// `None` when no Confluence base URL or token is configured.
    pub confluence_ingestion: Option<Arc<ConfluenceIngestion>>,
    pub knowledge_base: Arc<dyn KnowledgeBase>,
    pub max_upload_bytes: usize,
}
