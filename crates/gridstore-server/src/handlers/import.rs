//! Ingestion handlers: whole-file and chunked import.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::handlers::{error_response, invalid_rows_response, parse_rows};
use crate::types::{
    ErrorResponse, PushDataChunkedRequest, PushDataChunkedResponse, PushDataRequest,
    PushDataResponse,
};
use crate::AppState;
use gridstore_core::{IngestPolicy, UploadChunk};

/// Import a whole row set, replacing the previous dataset.
#[utoipa::path(
    post,
    path = "/push-data",
    tag = "import",
    request_body = PushDataRequest,
    responses(
        (status = 200, description = "Import complete", body = PushDataResponse),
        (status = 400, description = "Missing, empty, or malformed rows", body = ErrorResponse),
        (status = 500, description = "Inconsistent schema or store failure", body = ErrorResponse)
    )
)]
pub async fn push_data(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PushDataRequest>,
) -> impl IntoResponse {
    let Some(rows) = parse_rows(req.rows.as_ref()) else {
        return invalid_rows_response().into_response();
    };

    match state.engine.import(&rows, IngestPolicy::default()).await {
        Ok(summary) => {
            let message = match summary.mode {
                gridstore_core::StorageMode::JsonBlob => format!(
                    "Successfully imported {} rows using JSON storage",
                    summary.rows_inserted
                ),
                gridstore_core::StorageMode::Columnar => {
                    format!("Successfully imported {} rows", summary.rows_inserted)
                }
            };
            Json(PushDataResponse {
                success: true,
                message,
                rows_inserted: summary.rows_inserted,
                columns: summary.columns,
                storage_type: summary.mode.as_str().to_string(),
            })
            .into_response()
        }
        Err(err) => error_response(&err).into_response(),
    }
}

/// Import one chunk of a pre-split upload.
///
/// The first chunk replaces the previous dataset; later chunks append to
/// the same table generation.
#[utoipa::path(
    post,
    path = "/push-data-chunked",
    tag = "import",
    request_body = PushDataChunkedRequest,
    responses(
        (status = 200, description = "Chunk processed", body = PushDataChunkedResponse),
        (status = 400, description = "Missing, empty, or malformed rows", body = ErrorResponse),
        (status = 409, description = "Dataset rebuilt mid-upload", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn push_data_chunked(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PushDataChunkedRequest>,
) -> impl IntoResponse {
    let Some(rows) = parse_rows(req.rows.as_ref()) else {
        return invalid_rows_response().into_response();
    };

    let chunk = UploadChunk {
        rows,
        chunk_index: req.chunk_index,
        total_chunks: req.total_chunks,
        is_first_chunk: req.is_first_chunk,
        is_last_chunk: req.is_last_chunk,
    };

    match state.engine.import_chunk(chunk).await {
        Ok(report) => Json(PushDataChunkedResponse {
            success: true,
            message: format!(
                "Chunk {}/{} processed",
                req.chunk_index + 1,
                req.total_chunks
            ),
            chunk_index: req.chunk_index,
            total_chunks: req.total_chunks,
            rows_in_chunk: report.rows_in_chunk,
        })
        .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}
