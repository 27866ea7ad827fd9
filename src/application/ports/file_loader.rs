use async_trait::async_trait;

use crate::domain::Document;

#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError>;

    /// Text plus page boundaries. Loaders without a notion of pages return
    /// the plain text with no boundaries.
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractedText, FileLoaderError> {
        let text = self.extract_text(data, document).await?;
        Ok(ExtractedText::plain(text))
    }
}

/// Where a page begins in the extracted text, as a character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStart {
    pub number: u32,
    pub offset: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    /// Sorted by offset.
    pub pages: Vec<PageStart>,
}

impl ExtractedText {
    pub fn plain(text: String) -> Self {
        Self {
            text,
            pages: Vec::new(),
        }
    }

    /// Page holding the character at `offset`.
    pub fn page_at(&self, offset: usize) -> Option<u32> {
        let index = self.pages.partition_point(|p| p.offset <= offset);
        index.checked_sub(1).map(|i| self.pages[i].number)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no text found in {0}")]
    NoTextFound(String),
}
