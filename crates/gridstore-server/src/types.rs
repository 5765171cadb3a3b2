//! Request/Response types for the Gridstore REST API.
//!
//! Field names are camelCase on the wire, preserving the JSON contract the
//! data-grid client already speaks. Import payloads keep `rows` as untyped
//! JSON so malformed bodies surface as the API's own 400 responses instead
//! of extractor rejections.

use gridstore_core::Filter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ============================================================================
// Import Types
// ============================================================================

/// Request body for a whole-file import.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PushDataRequest {
    /// The row set; must be a non-empty array of objects.
    #[schema(value_type = Option<Vec<Object>>)]
    pub rows: Option<Value>,
}

/// Response for a completed whole-file import.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushDataResponse {
    /// Always true on success.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Rows inserted.
    pub rows_inserted: u64,
    /// Logical column names, in upload order.
    pub columns: Vec<String>,
    /// `"columns"` or `"json"`.
    pub storage_type: String,
}

/// Request body for one chunk of a pre-split import.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushDataChunkedRequest {
    /// Rows in this chunk; must be a non-empty array of objects.
    #[schema(value_type = Option<Vec<Object>>)]
    pub rows: Option<Value>,
    /// Zero-based chunk index.
    #[serde(default)]
    pub chunk_index: usize,
    /// Total number of chunks in the upload.
    #[serde(default)]
    pub total_chunks: usize,
    /// Whether this chunk replaces the previous dataset.
    #[serde(default)]
    pub is_first_chunk: bool,
    /// Whether this chunk completes the upload.
    #[serde(default)]
    pub is_last_chunk: bool,
}

/// Response for a processed chunk.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushDataChunkedResponse {
    /// Always true on success.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Echo of the processed chunk's index.
    pub chunk_index: usize,
    /// Echo of the upload's chunk count.
    pub total_chunks: usize,
    /// Rows inserted from this chunk.
    pub rows_in_chunk: usize,
}

// ============================================================================
// Query Types
// ============================================================================

/// Response carrying the full (rehydrated) dataset.
#[derive(Debug, Serialize, ToSchema)]
pub struct RowsResponse {
    /// Every row of the active dataset.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<gridstore_core::Row>,
}

/// Query string for free-text search.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchParams {
    /// Substring to search for across all columns.
    pub query: Option<String>,
}

/// Response for search and filter requests.
#[derive(Debug, Serialize, ToSchema)]
pub struct FilteredRowsResponse {
    /// Matching rows.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<gridstore_core::Row>,
    /// Number of matching rows.
    pub count: usize,
}

/// Request body for structured filtering.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FilterRequest {
    /// Predicates combined with logical AND; absent or empty returns all
    /// rows.
    #[schema(value_type = Option<Vec<Object>>)]
    pub filters: Option<Vec<Filter>>,
}

// ============================================================================
// Delete Types
// ============================================================================

/// Request body for deleting rows by id.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRowsRequest {
    /// Ids to delete; must be a non-empty array of positive integers.
    #[schema(value_type = Option<Vec<i64>>)]
    pub ids: Option<Value>,
}

/// Response for a delete request.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRowsResponse {
    /// Always true on success.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Rows actually removed (may be fewer than requested).
    pub deleted_count: u64,
}

// ============================================================================
// Error Type
// ============================================================================

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}
