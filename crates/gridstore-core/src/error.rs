//! Error types for Gridstore.
//!
//! A single unified error type covers every engine operation so the API
//! layer can map variants onto HTTP status codes in one place.

use thiserror::Error;

/// Result type alias for Gridstore operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Gridstore operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input. No state was changed.
    #[error("{0}")]
    Validation(String),

    /// Rows within one import do not all share the same column set.
    ///
    /// Raised before any table mutation.
    #[error("Inconsistent column structure in data")]
    InconsistentColumns,

    /// A filter referenced a column the current dataset does not have.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// No dataset has been imported yet.
    #[error("No dataset has been imported yet")]
    NoDataset,

    /// The dataset was rebuilt while a chunked upload was in flight.
    ///
    /// The remaining chunks of the stale upload must not append to the new
    /// table generation; the caller restarts from the first chunk.
    #[error("Dataset was rebuilt during upload (expected generation {expected}, found {actual})")]
    StaleGeneration {
        /// Generation captured when the upload started.
        expected: u64,
        /// Generation currently persisted in the dataset metadata.
        actual: u64,
    },

    /// Backing-store failure: connectivity, constraint, or statement error.
    ///
    /// The current transaction has been rolled back and the connection
    /// returned to the pool.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Row payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
