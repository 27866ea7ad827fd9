use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::application::ports::{DocumentSource, DocumentSourceError};
use crate::infrastructure::text_processing::html_to_text;

/// Confluence REST client authenticated with a personal access token.
pub struct ConfluenceClient {
    client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct ContentSearch {
    #[serde(default)]
    results: Vec<ContentRef>,
}

#[derive(Deserialize)]
struct ContentRef {
    id: String,
}

#[derive(Deserialize)]
struct ContentPage {
    body: ContentBody,
}

#[derive(Deserialize)]
struct ContentBody {
    storage: StorageValue,
}

#[derive(Deserialize)]
struct StorageValue {
    value: String,
}

impl ConfluenceClient {
    pub fn new(
        base_url: String,
        access_token: String,
        timeout: Duration,
    ) -> Result<Self, DocumentSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DocumentSourceError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    async fn get(&self, url: String, query: &[(&str, &str)]) -> Result<Response, DocumentSourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DocumentSourceError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DocumentSourceError::HttpStatus { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl DocumentSource for ConfluenceClient {
    #[tracing::instrument(skip(self))]
    async fn find_page_id(
        &self,
        space_key: &str,
        page_title: &str,
    ) -> Result<Option<String>, DocumentSourceError> {
        let url = format!("{}/rest/api/content", self.base_url);
        let response = self
            .get(url, &[("title", page_title), ("spaceKey", space_key)])
            .await?;

        let search: ContentSearch = response
            .json()
            .await
            .map_err(|e| DocumentSourceError::InvalidResponse(e.to_string()))?;

        Ok(search.results.into_iter().next().map(|r| r.id))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_page_text(&self, page_id: &str) -> Result<String, DocumentSourceError> {
        let url = format!("{}/rest/api/content/{}", self.base_url, page_id);
        let response = self.get(url, &[("expand", "body.storage")]).await?;

        let page: ContentPage = response
            .json()
            .await
            .map_err(|e| DocumentSourceError::InvalidResponse(e.to_string()))?;

        let text = html_to_text(&page.body.storage.value);
        tracing::debug!(chars = text.len(), "Page body converted to text");
        Ok(text)
    }
}
