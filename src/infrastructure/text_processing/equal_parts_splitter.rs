use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, DocumentId};

/// Splits text into `parts` pieces of `len / parts` characters; the last
/// piece also takes the remainder. Pieces are labelled `part1`, `part2`, ...
pub struct EqualPartsSplitter {
    parts: usize,
}

impl EqualPartsSplitter {
    pub fn new(parts: usize) -> Self {
        Self { parts }
    }
}

#[async_trait]
impl TextSplitter for EqualPartsSplitter {
    async fn split(
        &self,
        text: &str,
        document_id: DocumentId,
        source: &str,
    ) -> Result<Vec<Chunk>, TextSplitterError> {
        if self.parts == 0 {
            return Err(TextSplitterError::InvalidConfiguration(
                "part count must be greater than zero".to_string(),
            ));
        }

        let chars: Vec<char> = text.chars().collect();
        let part_len = chars.len() / self.parts;

        let chunks = (0..self.parts)
            .filter_map(|index| {
                let start = index * part_len;
                let end = if index + 1 == self.parts {
                    chars.len()
                } else {
                    start + part_len
                };
                if start == end {
                    return None;
                }
                let part: String = chars[start..end].iter().collect();
                Some(
                    Chunk::new(part, document_id, source, start)
                        .with_section(format!("part{}", index + 1)),
                )
            })
            .collect();

        Ok(chunks)
    }
}
