use serde::{Deserialize, Serialize};

use super::{Chunk, Embedding};

/// A chunk paired with the single embedding computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub chunk: Chunk,
    pub embedding: Embedding,
}

impl KnowledgeEntry {
    pub fn new(chunk: Chunk, embedding: Embedding) -> Self {
        Self { chunk, embedding }
    }
}
