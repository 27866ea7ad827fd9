use std::io::Write;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{ExtractedText, FileLoader, FileLoaderError, PageStart};
use crate::domain::{ContentType, Document};

use super::text_sanitizer::sanitize_extracted_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SEPARATOR: &str = "\n\n";

/// Text of one PDF page after sanitising.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage {
    pub number: u32,
    pub text: String,
}

#[derive(Default)]
pub struct PdfAdapter;

impl PdfAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Reads every page of the PDF at `path`. Pages without text are skipped.
    pub fn read_pages(path: &Path) -> Result<Vec<PdfPage>, FileLoaderError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let page_count = doc.page_count().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        let mut pages = Vec::with_capacity(page_count);

        for page_index in 0..page_count {
            let raw = match doc.extract_text(page_index) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(page = page_index + 1, error = %e, "Skipping unreadable page");
                    continue;
                }
            };

            let text = sanitize_extracted_text(&raw);
            if !text.is_empty() {
                pages.push(PdfPage {
                    number: (page_index + 1) as u32,
                    text,
                });
            }
        }

        Ok(pages)
    }

    async fn read_pages_from_bytes(data: &[u8]) -> Result<Vec<PdfPage>, FileLoaderError> {
        let mut temp_file = tempfile::NamedTempFile::new().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to create temp file: {e}"))
        })?;

        temp_file.write_all(data).map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to write temp file: {e}"))
        })?;

        // The temp file is removed when the guard drops, after the blocking read.
        let temp_path = temp_file.into_temp_path();
        let path = temp_path.to_path_buf();

        let pages = tokio::time::timeout(
            EXTRACTION_TIMEOUT,
            tokio::task::spawn_blocking(move || Self::read_pages(&path)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))?;

        drop(temp_path);
        pages
    }
}

/// Joins pages with a blank line and records where each one starts.
pub fn join_pages(pages: Vec<PdfPage>) -> ExtractedText {
    let mut text = String::new();
    let mut starts = Vec::with_capacity(pages.len());
    let mut offset = 0;

    for page in pages {
        if !text.is_empty() {
            text.push_str(PAGE_SEPARATOR);
            offset += PAGE_SEPARATOR.len();
        }
        starts.push(PageStart {
            number: page.number,
            offset,
        });
        offset += page.text.chars().count();
        text.push_str(&page.text);
    }

    ExtractedText {
        text,
        pages: starts,
    }
}

#[async_trait]
impl FileLoader for PdfAdapter {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        self.extract(data, document).await.map(|extracted| extracted.text)
    }

    #[tracing::instrument(
        skip(self, data),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractedText, FileLoaderError> {
        if document.content_type != ContentType::Pdf {
            return Err(FileLoaderError::UnsupportedContentType(
                document.content_type.as_mime().to_string(),
            ));
        }

        let pages = Self::read_pages_from_bytes(data).await?;
        tracing::info!(page_count = pages.len(), "PDF text extraction complete");

        if pages.is_empty() {
            return Err(FileLoaderError::NoTextFound(document.filename.clone()));
        }

        Ok(join_pages(pages))
    }
}
