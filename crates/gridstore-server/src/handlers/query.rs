//! Search and filter handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::handlers::error_response;
use crate::types::{ErrorResponse, FilterRequest, FilteredRowsResponse, SearchParams};
use crate::AppState;

/// Free-text search across every column of the dataset.
#[utoipa::path(
    get,
    path = "/search",
    tag = "query",
    params(
        ("query" = String, Query, description = "Substring to search for")
    ),
    responses(
        (status = 200, description = "Matching rows", body = FilteredRowsResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 500, description = "No dataset or store failure", body = ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let Some(query) = params.query.filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Search query is required".to_string(),
            }),
        )
            .into_response();
    };

    match state.engine.search(&query).await {
        Ok(rows) => {
            let count = rows.len();
            Json(FilteredRowsResponse { rows, count }).into_response()
        }
        Err(err) => error_response(&err).into_response(),
    }
}

/// Apply a structured filter list (AND-combined) to the dataset.
///
/// An absent or empty filter list returns every row.
#[utoipa::path(
    post,
    path = "/filter",
    tag = "query",
    request_body = FilterRequest,
    responses(
        (status = 200, description = "Matching rows", body = FilteredRowsResponse),
        (status = 400, description = "Unknown filter column", body = ErrorResponse),
        (status = 500, description = "No dataset or store failure", body = ErrorResponse)
    )
)]
pub async fn filter_rows(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRequest>,
) -> impl IntoResponse {
    let filters = req.filters.unwrap_or_default();

    match state.engine.filter(&filters).await {
        Ok(rows) => {
            let count = rows.len();
            Json(FilteredRowsResponse { rows, count }).into_response()
        }
        Err(err) => error_response(&err).into_response(),
    }
}
