use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{DocumentSourceError, KnowledgeBase, KnowledgeBaseError};
use crate::application::services::{
    ConfluenceIngestion, DirectoryIngestion, IngestionService, PromptTemplate, RetrievalOptions,
    RetrievalService,
};
use crate::infrastructure::confluence::ConfluenceClient;
use crate::infrastructure::llm::{
    EmbedderFactory, EmbedderFactoryError, LlmClientFactory, LlmClientFactoryError,
};
use crate::infrastructure::persistence::{InMemoryKnowledgeBase, JsonFileKnowledgeBase};
use crate::infrastructure::text_processing::{CompositeFileLoader, TextSplitterFactory};
use crate::presentation::config::{KnowledgeBaseBackend, Settings};
use crate::presentation::state::AppState;

const DEFAULT_CONFLUENCE_TIMEOUT_SECS: u64 = 30;

/// Everything the server and the CLI commands need, wired from settings.
#[derive(Clone)]
pub struct Services {
    pub ingestion: Arc<IngestionService>,
    pub retrieval: Arc<RetrievalService>,
    pub directory_ingestion: Arc<DirectoryIngestion>,
    pub confluence_ingestion: Option<Arc<ConfluenceIngestion>>,
    pub knowledge_base: Arc<dyn KnowledgeBase>,
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("embedder: {0}")]
    Embedder(#[from] EmbedderFactoryError),
    #[error("LLM client: {0}")]
    LlmClient(#[from] LlmClientFactoryError),
    #[error("knowledge base: {0}")]
    KnowledgeBase(#[from] KnowledgeBaseError),
    #[error("confluence: {0}")]
    Confluence(#[from] DocumentSourceError),
}

impl Services {
    pub async fn from_settings(settings: &Settings) -> Result<Self, BootstrapError> {
        let embedder = EmbedderFactory::create(&settings.embeddings)?;
        let llm_client = LlmClientFactory::create(&settings.llm)?;
        let knowledge_base = open_knowledge_base(settings).await?;
        let text_splitter = TextSplitterFactory::create(&settings.chunking);
        let file_loader = Arc::new(CompositeFileLoader::with_default_adapters());

        let ingestion = Arc::new(IngestionService::new(
            file_loader,
            Arc::clone(&embedder),
            Arc::clone(&knowledge_base),
            text_splitter,
            settings.ingestion.max_file_size_bytes(),
        ));

        let retrieval_settings = &settings.retrieval;
        let prompt = retrieval_settings
            .prompt_template
            .as_deref()
            .map(PromptTemplate::new)
            .unwrap_or_default();

        let retrieval = Arc::new(RetrievalService::new(
            embedder,
            llm_client,
            Arc::clone(&knowledge_base),
            RetrievalOptions {
                top_k: retrieval_settings.top_k,
                min_score: retrieval_settings.min_score,
                max_context_tokens: retrieval_settings.max_context_tokens,
                prompt,
            },
        ));

        let confluence_ingestion = match (
            settings.confluence.base_url.as_ref(),
            settings.confluence.access_token.as_ref(),
        ) {
            (Some(base_url), Some(token)) if !token.trim().is_empty() => {
                let timeout = Duration::from_secs(
                    settings
                        .confluence
                        .timeout_secs
                        .unwrap_or(DEFAULT_CONFLUENCE_TIMEOUT_SECS),
                );
                let client = ConfluenceClient::new(base_url.clone(), token.clone(), timeout)?;
                tracing::info!(base_url = %base_url, "Confluence source enabled");
                Some(Arc::new(ConfluenceIngestion::new(
                    Arc::new(client),
                    Arc::clone(&ingestion),
                )))
            }
            _ => {
                tracing::debug!("Confluence source not configured");
                None
            }
        };

        Ok(Self {
            directory_ingestion: Arc::new(DirectoryIngestion::new(Arc::clone(&ingestion))),
            ingestion,
            retrieval,
            confluence_ingestion,
            knowledge_base,
        })
    }

    pub fn app_state(&self, max_upload_bytes: usize) -> AppState {
        AppState {
            ingestion_service: Arc::clone(&self.ingestion),
            retrieval_service: Arc::clone(&self.retrieval),
            confluence_ingestion: self.confluence_ingestion.clone(),
            knowledge_base: Arc::clone(&self.knowledge_base),
            max_upload_bytes,
        }
    }
}

async fn open_knowledge_base(
    settings: &Settings,
) -> Result<Arc<dyn KnowledgeBase>, KnowledgeBaseError> {
    match settings.knowledge_base.backend {
        KnowledgeBaseBackend::Memory => {
            tracing::info!("Using in-memory knowledge base");
            Ok(Arc::new(InMemoryKnowledgeBase::new()))
        }
        KnowledgeBaseBackend::File => {
            let kb = JsonFileKnowledgeBase::open(&settings.knowledge_base.path).await?;
            Ok(Arc::new(kb))
        }
    }
}
