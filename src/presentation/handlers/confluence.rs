use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::error::error_response;
use crate::application::services::{ConfluenceIngestionError, IngestionReport};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct ConfluenceIngestRequest {
    #[serde(default)]
    pub space_key: String,
    #[serde(default)]
    pub page_title: String,
}

#[derive(Serialize)]
pub struct ConfluenceIngestResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: IngestionReport,
}

#[tracing::instrument(skip(state, request), fields(space_key = %request.space_key, page_title = %request.page_title))]
pub async fn confluence_ingest_handler(
    State(state): State<AppState>,
    Json(request): Json<ConfluenceIngestRequest>,
) -> Response {
    let space_key = request.space_key.trim();
    let page_title = request.page_title.trim();
    if space_key.is_empty() || page_title.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Both space_key and page_title are required.",
        );
    }

    let Some(confluence) = state.confluence_ingestion.as_ref() else {
        tracing::warn!("Confluence ingestion requested but not configured");
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Confluence is not configured.",
        );
    };

    match confluence.load_page(space_key, page_title).await {
        Ok(document) => (
            StatusCode::OK,
            Json(ConfluenceIngestResponse {
                message: format!("Content from '{page_title}' has been indexed."),
                report: document.report,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Confluence ingestion failed");
            let status = match &e {
                ConfluenceIngestionError::PageNotFound { .. } => StatusCode::NOT_FOUND,
                ConfluenceIngestionError::EmptyPage(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ConfluenceIngestionError::Source(_) => StatusCode::BAD_GATEWAY,
                ConfluenceIngestionError::Ingestion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(status, e.to_string())
        }
    }
}
