//! Gridstore Server - REST API library for the Gridstore data store.
//!
//! This module provides the HTTP handlers and types for the Gridstore
//! REST API.
//!
//! ## OpenAPI Documentation
//!
//! The API is documented using OpenAPI 3.0. Access the interactive
//! documentation at:
//! - Swagger UI: `GET /swagger-ui`
//! - OpenAPI JSON: `GET /api-docs/openapi.json`

mod handlers;
mod types;

use gridstore_core::Engine;
use utoipa::OpenApi;

// Re-export types for external use
pub use types::*;

// Re-export handlers for routing
pub use handlers::{
    delete_rows, filter_rows, get_rows, health_check, push_data, push_data_chunked, search,
};

// ============================================================================
// OpenAPI Documentation
// ============================================================================

/// Gridstore API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gridstore API",
        version = "0.1.0",
        description = "Dynamic-schema tabular data store. Imports row sets of \
            arbitrary shape into a MySQL table whose schema is derived from \
            the data, and serves search/filter/delete over it.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rows", description = "Dataset fetch and row deletion"),
        (name = "import", description = "Whole-file and chunked ingestion"),
        (name = "query", description = "Free-text search and structured filtering")
    ),
    paths(
        handlers::health::health_check,
        handlers::rows::get_rows,
        handlers::import::push_data,
        handlers::import::push_data_chunked,
        handlers::query::search,
        handlers::query::filter_rows,
        handlers::delete::delete_rows
    ),
    components(
        schemas(
            PushDataRequest,
            PushDataResponse,
            PushDataChunkedRequest,
            PushDataChunkedResponse,
            RowsResponse,
            FilteredRowsResponse,
            FilterRequest,
            DeleteRowsRequest,
            DeleteRowsResponse,
            ErrorResponse
        )
    )
)]
pub struct ApiDoc;

// ============================================================================
// Application State
// ============================================================================

/// Application state shared across handlers.
pub struct AppState {
    /// The Gridstore engine instance.
    pub engine: Engine,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_spec_generation() {
        let openapi = ApiDoc::openapi();
        let json = openapi.to_json().expect("Failed to serialize OpenAPI spec");
        assert!(!json.is_empty(), "OpenAPI spec should not be empty");
        assert!(json.contains("Gridstore API"), "Should contain API title");
    }

    #[test]
    fn test_openapi_has_all_endpoints() {
        let openapi = ApiDoc::openapi();
        let json = openapi.to_json().expect("Failed to serialize OpenAPI spec");
        assert!(json.contains("/health"), "Should document /health");
        assert!(json.contains("/push-data"), "Should document /push-data");
        assert!(
            json.contains("/push-data-chunked"),
            "Should document chunked import"
        );
        assert!(json.contains("/search"), "Should document /search");
        assert!(json.contains("/filter"), "Should document /filter");
        assert!(json.contains("/delete-row"), "Should document /delete-row");
    }

    #[test]
    fn test_push_data_request_deserialize() {
        let json = r#"{"rows": [{"a": 1, "b": "x"}]}"#;
        let req: PushDataRequest = serde_json::from_str(json).unwrap();
        assert!(req.rows.is_some());
    }

    #[test]
    fn test_chunked_request_camel_case() {
        let json = r#"{"rows": [{"a": 1}], "chunkIndex": 2, "totalChunks": 5,
                       "isFirstChunk": false, "isLastChunk": false}"#;
        let req: PushDataChunkedRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.chunk_index, 2);
        assert_eq!(req.total_chunks, 5);
        assert!(!req.is_first_chunk);
    }

    #[test]
    fn test_chunked_request_defaults() {
        let json = r#"{"rows": [{"a": 1}]}"#;
        let req: PushDataChunkedRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.chunk_index, 0);
        assert_eq!(req.total_chunks, 0);
        assert!(!req.is_first_chunk);
        assert!(!req.is_last_chunk);
    }

    #[test]
    fn test_push_data_response_camel_case() {
        let resp = PushDataResponse {
            success: true,
            message: "ok".to_string(),
            rows_inserted: 3,
            columns: vec!["a".to_string()],
            storage_type: "columns".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"rowsInserted\":3"));
        assert!(json.contains("\"storageType\":\"columns\""));
    }

    #[test]
    fn test_delete_response_camel_case() {
        let resp = DeleteRowsResponse {
            success: true,
            message: "ok".to_string(),
            deleted_count: 2,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"deletedCount\":2"));
    }

    #[test]
    fn test_filter_request_deserialize() {
        let json = r#"{"filters": [{"column": "a", "operator": "equals", "value": "1"}]}"#;
        let req: FilterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.filters.unwrap().len(), 1);
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse {
            error: "Test error".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"error\":\"Test error\""));
    }
}
