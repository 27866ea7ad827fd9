use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, DocumentId};

pub const DEFAULT_SECTION_KEYWORDS: [&str; 4] = ["overview", "getting started", "features", "pricing"];

/// Splits text into sections at heading-like lines.
///
/// A trimmed line is a heading when it is written in capitals, or when it
/// contains one of the keywords (case-insensitive). The heading becomes the
/// section label of the following lines, which are joined with spaces.
pub struct SectionSplitter {
    keywords: Vec<String>,
}

impl SectionSplitter {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_heading(&self, line: &str) -> bool {
        if is_uppercase_line(line) {
            return true;
        }
        let lowered = line.to_lowercase();
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && lowered.contains(k.as_str()))
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

/// At least one cased character and no lowercase ones.
fn is_uppercase_line(line: &str) -> bool {
    let mut has_cased = false;
    for ch in line.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

struct OpenSection {
    label: String,
    content: String,
    offset: usize,
}

impl OpenSection {
    fn into_chunk(self, document_id: DocumentId, source: &str) -> Option<Chunk> {
        if self.content.is_empty() {
            return None;
        }
        Some(Chunk::new(self.content, document_id, source, self.offset).with_section(self.label))
    }
}

#[async_trait]
impl TextSplitter for SectionSplitter {
    async fn split(
        &self,
        text: &str,
        document_id: DocumentId,
        source: &str,
    ) -> Result<Vec<Chunk>, TextSplitterError> {
        let mut chunks = Vec::new();
        let mut current = OpenSection {
            label: String::new(),
            content: String::new(),
            offset: 0,
        };
        let mut position = 0;

        for raw_line in text.split('\n') {
            let line_start = position;
            position += raw_line.chars().count() + 1;

            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if self.is_heading(line) {
                let finished = std::mem::replace(
                    &mut current,
                    OpenSection {
                        label: line.to_string(),
                        content: String::new(),
                        offset: line_start,
                    },
                );
                chunks.extend(finished.into_chunk(document_id, source));
            } else {
                if current.content.is_empty() {
                    if current.label.is_empty() {
                        current.offset = line_start;
                    }
                } else {
                    current.content.push(' ');
                }
                current.content.push_str(line);
            }
        }

        chunks.extend(current.into_chunk(document_id, source));
        Ok(chunks)
    }
}
