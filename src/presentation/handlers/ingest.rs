use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error::error_response;
use crate::application::ports::FileLoaderError;
use crate::application::services::{IngestionError, IngestionReport};
use crate::domain::ContentType;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct IngestResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: IngestionReport,
}

/// Accepts one uploaded file (the `file` field, or the first field carrying
/// a filename) and ingests it before responding.
#[tracing::instrument(skip(state, multipart))]
pub async fn ingest_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") || field.file_name().is_some() => {
                break field;
            }
            Ok(Some(_)) => continue,
            Ok(None) => {
                tracing::warn!("Ingest request with no file");
                return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {e}"),
                );
            }
        }
    };

    let filename = field.file_name().unwrap_or("unknown").to_string();
    let mime = field.content_type().unwrap_or("application/octet-stream").to_string();

    let Some(content_type) =
        ContentType::from_mime(&mime).or_else(|| ContentType::from_extension(&filename))
    else {
        tracing::warn!(filename = %filename, content_type = %mime, "Unsupported content type");
        return error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported content type: {mime}"),
        );
    };

    let data = match field.bytes().await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return error_response(e.status(), format!("Failed to read file: {e}"));
        }
    };

    tracing::debug!(filename = %filename, bytes = data.len(), "File received");

    match state
        .ingestion_service
        .ingest(&data, filename.clone(), content_type)
        .await
    {
        Ok(document) => {
            let report = document.report;
            (
                StatusCode::OK,
                Json(IngestResponse {
                    message: format!(
                        "Ingested {} of {} chunks from {}",
                        report.chunks_stored, report.chunks_total, filename
                    ),
                    report,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(filename = %filename, error = %e, "Ingestion failed");
            error_response(ingestion_status(&e), e.to_string())
        }
    }
}

fn ingestion_status(error: &IngestionError) -> StatusCode {
    match error {
        IngestionError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        IngestionError::FileLoading(FileLoaderError::UnsupportedContentType(_)) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        IngestionError::FileLoading(_) => StatusCode::BAD_REQUEST,
        IngestionError::Splitting(_) | IngestionError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
