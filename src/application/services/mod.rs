mod confluence_ingestion;
mod context_builder;
mod directory_ingestion;
mod ingestion_service;
mod prompt;
mod retrieval_service;

pub use confluence_ingestion::{ConfluenceIngestion, ConfluenceIngestionError};
pub use context_builder::{AssembledContext, assemble_context, count_tokens};
pub use directory_ingestion::{
    DirectoryIngestion, DirectoryIngestionError, DirectoryReport, find_pdfs, relative_key,
};
pub use ingestion_service::{IngestedDocument, IngestionError, IngestionReport, IngestionService};
pub use prompt::{DEFAULT_PROMPT_TEMPLATE, PromptTemplate};
pub use retrieval_service::{
    NO_RELEVANT_INFORMATION, NO_RESPONSE_GENERATED, QueryResponse, RetrievalError,
    RetrievalOptions, RetrievalService, SourceChunk,
};
