mod chunk;
mod document;
mod embedding;
mod knowledge_entry;
mod size_category;

pub use chunk::{Chunk, ChunkId, DocumentId};
pub use document::{ContentType, Document};
pub use embedding::Embedding;
pub use knowledge_entry::KnowledgeEntry;
pub use size_category::SizeCategory;
