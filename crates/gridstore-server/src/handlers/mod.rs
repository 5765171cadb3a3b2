//! HTTP handlers for the Gridstore REST API.
//!
//! This module organizes handlers by domain:
//! - `health`: Health check endpoint
//! - `rows`: Full-dataset fetch
//! - `import`: Whole-file and chunked ingestion
//! - `query`: Free-text search and structured filtering
//! - `delete`: Row deletion by id

pub mod delete;
pub mod health;
pub mod import;
pub mod query;
pub mod rows;

pub use delete::delete_rows;
pub use health::health_check;
pub use import::{push_data, push_data_chunked};
pub use query::{filter_rows, search};
pub use rows::get_rows;

use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::types::ErrorResponse;
use gridstore_core::{Error, Row};

/// Maps an engine error onto its HTTP status.
///
/// Validation problems are the caller's fault (400); a stale chunked upload
/// is a conflict with a concurrent rebuild (409); everything else —
/// including an inconsistent column set, per the original service's
/// contract — is a 500.
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) | Error::UnknownColumn(_) => StatusCode::BAD_REQUEST,
        Error::StaleGeneration { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(err: &Error) -> (StatusCode, Json<ErrorResponse>) {
    (
        status_for(err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Extracts a non-empty array of row objects from an untyped `rows` field.
///
/// Returns `None` for a missing field, a non-array, an empty array, or any
/// non-object element — all of which the API reports as one 400.
pub(crate) fn parse_rows(value: Option<&Value>) -> Option<Vec<Row>> {
    let items = value?.as_array()?;
    if items.is_empty() {
        return None;
    }

    items
        .iter()
        .map(|item| item.as_object().cloned())
        .collect()
}

pub(crate) fn invalid_rows_response() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "No data provided or invalid format".to_string(),
        }),
    )
}
