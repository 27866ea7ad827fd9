mod document_source;
mod embedder;
mod file_loader;
mod knowledge_base;
mod knowledge_base_error;
mod llm_client;
mod search_result;
mod text_splitter;

pub use document_source::{DocumentSource, DocumentSourceError};
pub use embedder::{Embedder, EmbedderError};
pub use file_loader::{ExtractedText, FileLoader, FileLoaderError, PageStart};
pub use knowledge_base::{KnowledgeBase, SourceSummary};
pub use knowledge_base_error::KnowledgeBaseError;
pub use llm_client::{LlmClient, LlmClientError};
pub use search_result::SearchResult;
pub use text_splitter::{TextSplitter, TextSplitterError};
