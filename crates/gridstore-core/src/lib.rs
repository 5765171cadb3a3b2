//! # Gridstore Core
//!
//! Dynamic-schema tabular storage engine over MySQL.
//!
//! Gridstore accepts arbitrary tabular data of unknown, changing shape and
//! persists it into a relational table whose schema is derived from the
//! data on every import. Narrow datasets get one physical column per
//! logical column at an inferred text-capacity tier; datasets wider than
//! 50 columns are packed into a single serialized JSON payload column.
//! Search, filtering, and deletion translate to SQL or to in-process
//! predicates depending on which representation is active.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gridstore_core::{Engine, IngestPolicy};
//! use sqlx::mysql::MySqlPoolOptions;
//!
//! let pool = MySqlPoolOptions::new().connect(&database_url).await?;
//! let engine = Engine::new(pool, "data_table");
//!
//! // Import replaces the previous dataset wholesale
//! engine.import(&rows, IngestPolicy::default()).await?;
//!
//! // Query it back
//! let all = engine.fetch_all().await?;
//! let hits = engine.search("acme").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod schema;
mod store;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod filter_tests;
#[cfg(test)]
mod ingest_tests;

pub use dataset::DatasetMeta;
pub use engine::{ChunkReport, Engine, ImportSummary};
pub use error::{Error, Result};
pub use filter::{Filter, FilterOp};
pub use ingest::{ChunkProgress, IngestPolicy, UploadChunk};
pub use schema::{ColumnType, Row, StorageMode, TablePlan, MAX_COLUMNS_PER_TABLE};
