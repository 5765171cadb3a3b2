//! Row deletion handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::handlers::error_response;
use crate::types::{DeleteRowsRequest, DeleteRowsResponse, ErrorResponse};
use crate::AppState;

/// Delete rows by id list.
///
/// Returns the number of rows actually removed, which may be smaller than
/// the request when some ids do not exist.
#[utoipa::path(
    delete,
    path = "/delete-row",
    tag = "rows",
    request_body = DeleteRowsRequest,
    responses(
        (status = 200, description = "Rows deleted", body = DeleteRowsResponse),
        (status = 400, description = "Empty or invalid id list", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn delete_rows(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRowsRequest>,
) -> impl IntoResponse {
    let items = match req.ids.as_ref().and_then(|v| v.as_array()) {
        Some(items) if !items.is_empty() => items,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No row IDs provided".to_string(),
                }),
            )
                .into_response()
        }
    };

    let Some(ids) = items
        .iter()
        .map(serde_json::Value::as_i64)
        .collect::<Option<Vec<i64>>>()
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid row IDs provided".to_string(),
            }),
        )
            .into_response();
    };

    match state.engine.delete_by_ids(&ids).await {
        Ok(deleted) => Json(DeleteRowsResponse {
            success: true,
            message: format!("Successfully deleted {deleted} row(s)"),
            deleted_count: deleted,
        })
        .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}
