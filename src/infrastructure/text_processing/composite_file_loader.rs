use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{ExtractedText, FileLoader, FileLoaderError};
use crate::domain::{ContentType, Document};

use super::{HtmlAdapter, PdfAdapter, PlainTextAdapter};

/// Routes a document to the loader registered for its content type.
pub struct CompositeFileLoader {
    adapters: HashMap<ContentType, Arc<dyn FileLoader>>,
}

impl CompositeFileLoader {
    pub fn new(adapters: Vec<(ContentType, Arc<dyn FileLoader>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }

    /// PDF, HTML and plain text loaders.
    pub fn with_default_adapters() -> Self {
        let pdf: Arc<dyn FileLoader> = Arc::new(PdfAdapter::new());
        let html: Arc<dyn FileLoader> = Arc::new(HtmlAdapter);
        let text: Arc<dyn FileLoader> = Arc::new(PlainTextAdapter);

        Self::new(vec![
            (ContentType::Pdf, pdf),
            (ContentType::Html, html),
            (ContentType::Text, text),
        ])
    }
}

impl CompositeFileLoader {
    fn adapter_for(&self, document: &Document) -> Result<&Arc<dyn FileLoader>, FileLoaderError> {
        self.adapters.get(&document.content_type).ok_or_else(|| {
            FileLoaderError::UnsupportedContentType(document.content_type.as_mime().to_string())
        })
    }
}

#[async_trait]
impl FileLoader for CompositeFileLoader {
    async fn extract_text(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<String, FileLoaderError> {
        self.adapter_for(document)?.extract_text(data, document).await
    }

    async fn extract(
        &self,
        data: &[u8],
        document: &Document,
    ) -> Result<ExtractedText, FileLoaderError> {
        self.adapter_for(document)?.extract(data, document).await
    }
}
