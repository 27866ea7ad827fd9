use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::error::error_response;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";

#[derive(Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceChunk>,
}

#[derive(Serialize)]
pub struct SourceChunk {
    pub text: String,
    pub source: String,
    pub section: Option<String>,
    pub page: Option<u32>,
    pub score: f32,
}

#[tracing::instrument(skip(state, request))]
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    let question = request.question.trim();
    if question.is_empty() {
        tracing::warn!("Query without a question");
        return error_response(StatusCode::BAD_REQUEST, EMPTY_QUESTION_MESSAGE);
    }

    tracing::debug!(question = %sanitize_prompt(question), "Processing query");

    match state.retrieval_service.query(question).await {
        Ok(response) => {
            tracing::info!(
                sources_count = response.sources.len(),
                generation_failed = response.generation_failed,
                "Query answered"
            );
            let sources = response
                .sources
                .into_iter()
                .map(|s| SourceChunk {
                    text: s.text,
                    source: s.source,
                    section: s.section,
                    page: s.page,
                    score: s.score,
                })
                .collect();

            (
                StatusCode::OK,
                Json(QueryResponse {
                    answer: response.answer,
                    sources,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Query failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error generating response: {e}"),
            )
        }
    }
}
