//! Full-dataset fetch handler.

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::handlers::error_response;
use crate::types::{ErrorResponse, RowsResponse};
use crate::AppState;

/// Fetch every row of the active dataset.
///
/// JSON-blob datasets come back rehydrated: payload fields are merged over
/// the row and the raw payload column is dropped.
#[utoipa::path(
    get,
    path = "/",
    tag = "rows",
    responses(
        (status = 200, description = "All rows", body = RowsResponse),
        (status = 500, description = "No dataset or store failure", body = ErrorResponse)
    )
)]
pub async fn get_rows(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.engine.fetch_all().await {
        Ok(rows) => Json(RowsResponse { rows }).into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}
