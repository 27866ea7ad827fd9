use async_trait::async_trait;

/// Remote documentation space that pages can be pulled from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Looks a page up by title. `Ok(None)` when the space has no such page.
    async fn find_page_id(
        &self,
        space_key: &str,
        page_title: &str,
    ) -> Result<Option<String>, DocumentSourceError>;

    /// Fetches a page and returns its body as plain text.
    async fn fetch_page_text(&self, page_id: &str) -> Result<String, DocumentSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentSourceError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
