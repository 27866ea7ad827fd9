mod embedding_export;
mod in_memory_knowledge_base;
mod json_file_knowledge_base;

pub use embedding_export::{
    embedding_collection_filename, write_embedding_collection, write_text_dump,
};
pub use in_memory_knowledge_base::InMemoryKnowledgeBase;
pub use json_file_knowledge_base::JsonFileKnowledgeBase;
