use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, DocumentId};

/// Cuts text into windows of `chunk_size` characters, each starting
/// `chunk_size - chunk_overlap` characters after the previous one.
///
/// With no overlap a text of `L` characters yields `ceil(L / chunk_size)`
/// chunks that concatenate back to the original.
pub struct FixedSizeSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    fn step(&self) -> usize {
        if self.chunk_size > self.chunk_overlap {
            self.chunk_size - self.chunk_overlap
        } else {
            self.chunk_size
        }
    }
}

#[async_trait]
impl TextSplitter for FixedSizeSplitter {
    async fn split(
        &self,
        text: &str,
        document_id: DocumentId,
        source: &str,
    ) -> Result<Vec<Chunk>, TextSplitterError> {
        if self.chunk_size == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        let chars: Vec<char> = text.chars().collect();
        let total_len = chars.len();
        let step = self.step();
        let mut chunks = Vec::with_capacity(total_len.div_ceil(step));

        let mut offset = 0;
        while offset < total_len {
            let end = (offset + self.chunk_size).min(total_len);
            let chunk_text: String = chars[offset..end].iter().collect();

            chunks.push(Chunk::new(chunk_text, document_id, source, offset));

            if end == total_len {
                break;
            }
            offset += step;
        }

        Ok(chunks)
    }
}
