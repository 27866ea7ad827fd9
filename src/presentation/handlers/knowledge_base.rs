use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error::error_response;
use crate::application::ports::SourceSummary;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct KnowledgeBaseSummary {
    pub entries: usize,
    pub sources: Vec<SourceSummary>,
}

pub async fn knowledge_base_handler(State(state): State<AppState>) -> Response {
    let summary = async {
        let entries = state.knowledge_base.len().await?;
        let sources = state.knowledge_base.sources().await?;
        Ok::<_, crate::application::ports::KnowledgeBaseError>(KnowledgeBaseSummary {
            entries,
            sources,
        })
    }
    .await;

    match summary {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to read knowledge base");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub async fn clear_knowledge_base_handler(State(state): State<AppState>) -> Response {
    match state.knowledge_base.clear().await {
        Ok(()) => {
            tracing::info!("Knowledge base cleared");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear knowledge base");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
