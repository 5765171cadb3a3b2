//! Batch ingestion.
//!
//! Both ingestion protocols (whole-file and chunked) share one primitive:
//! split the rows into sequential groups and execute each group as a single
//! multi-row INSERT inside its own transaction. A failing group rolls back
//! alone; whether earlier groups stay committed is the caller's choice via
//! [`IngestPolicy`].

use serde::Serialize;
use sqlx::mysql::MySqlPool;
use sqlx::{MySql, Transaction};

use crate::error::Result;
use crate::schema::{quote_ident, render_text, Row, StorageMode};

/// Rows per INSERT group in JSON-blob mode (one bind per row).
pub const JSON_BATCH_SIZE: usize = 1000;

/// Rows per INSERT group in columnar mode. Smaller than the JSON group size
/// because each row contributes one bind per physical column.
pub const COLUMNAR_BATCH_SIZE: usize = 100;

/// Partial-failure policy for a whole-file import.
///
/// Batched inserts are only ever atomic per group; whether the groups
/// before a failing one survive is a policy decision, not an accident of
/// transaction boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestPolicy {
    /// Each group commits on its own; a mid-import failure leaves earlier
    /// groups persisted. Matches the chunked protocol's semantics.
    #[default]
    PerBatch,
    /// All groups share one outer transaction; a failure anywhere rolls
    /// back the entire import.
    Atomic,
}

/// A caller-defined slice of an import, submitted as a separate request.
#[derive(Debug, Clone)]
pub struct UploadChunk {
    /// Rows in this chunk.
    pub rows: Vec<Row>,
    /// Zero-based index of this chunk.
    pub chunk_index: usize,
    /// Total number of chunks in the upload.
    pub total_chunks: usize,
    /// Whether this chunk triggers the table rebuild.
    pub is_first_chunk: bool,
    /// Whether this chunk completes the upload.
    pub is_last_chunk: bool,
}

/// Progress snapshot reported after each chunk.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkProgress {
    /// Zero-based index of the chunk just processed.
    pub chunk_index: usize,
    /// Total number of chunks in the upload.
    pub total_chunks: usize,
    /// Percentage of chunks processed so far.
    pub percent: f64,
    /// Rows inserted so far across the whole upload.
    pub rows_processed: u64,
    /// Total rows in the upload; estimated from the first chunk until the
    /// last chunk corrects it to the running count.
    pub total_rows: u64,
    /// Effective INSERT group size used for this chunk.
    pub batch_size: usize,
}

/// Computes the INSERT group size for a chunk from its column count.
///
/// Wide datasets get smaller groups so the total statement/payload size
/// stays bounded: `max(floor, budget / column_count)` with tiers, falling
/// through to `default_size` for anything up to 100 columns.
#[must_use]
pub fn chunk_batch_size(column_count: usize, default_size: usize) -> usize {
    if column_count > 1000 {
        (50_000 / column_count).max(10)
    } else if column_count > 500 {
        (100_000 / column_count).max(50)
    } else if column_count > 100 {
        (200_000 / column_count).max(100)
    } else {
        default_size
    }
}

/// The fixed whole-file group size for a storage mode.
#[must_use]
pub fn default_batch_size(mode: StorageMode) -> usize {
    match mode {
        StorageMode::JsonBlob => JSON_BATCH_SIZE,
        StorageMode::Columnar => COLUMNAR_BATCH_SIZE,
    }
}

/// Renders the multi-row INSERT statement for columnar storage.
pub(crate) fn columnar_insert_sql(table: &str, columns: &[String], row_count: usize) -> String {
    let column_list: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let row_placeholders = format!(
        "({})",
        columns.iter().map(|_| "?").collect::<Vec<_>>().join(", ")
    );
    let placeholders: Vec<&str> = (0..row_count).map(|_| row_placeholders.as_str()).collect();

    format!(
        "INSERT INTO {} ({}) VALUES {}",
        quote_ident(table),
        column_list.join(", "),
        placeholders.join(", ")
    )
}

/// Renders the multi-row INSERT statement for JSON-blob storage.
pub(crate) fn json_insert_sql(table: &str, row_count: usize) -> String {
    let placeholders: Vec<&str> = (0..row_count).map(|_| "(?)").collect();
    format!(
        "INSERT INTO {} (json_data) VALUES {}",
        quote_ident(table),
        placeholders.join(", ")
    )
}

/// Inserts `rows` in size-bounded groups under the given policy.
///
/// Returns the number of rows inserted. Under [`IngestPolicy::PerBatch`] a
/// failing group surfaces its error after rolling back only itself; the
/// transaction (and its pooled connection) is released on every exit path.
pub(crate) async fn insert_rows(
    pool: &MySqlPool,
    table: &str,
    mode: StorageMode,
    columns: &[String],
    rows: &[Row],
    batch_size: usize,
    policy: IngestPolicy,
) -> Result<u64> {
    let mut inserted: u64 = 0;

    match policy {
        IngestPolicy::PerBatch => {
            for batch in rows.chunks(batch_size) {
                let mut tx = pool.begin().await?;
                insert_batch(&mut tx, table, mode, columns, batch).await?;
                tx.commit().await?;
                inserted += batch.len() as u64;
            }
        }
        IngestPolicy::Atomic => {
            let mut tx = pool.begin().await?;
            for batch in rows.chunks(batch_size) {
                insert_batch(&mut tx, table, mode, columns, batch).await?;
                inserted += batch.len() as u64;
            }
            tx.commit().await?;
        }
    }

    Ok(inserted)
}

/// Executes one multi-row INSERT for `batch` inside `tx`.
async fn insert_batch(
    tx: &mut Transaction<'_, MySql>,
    table: &str,
    mode: StorageMode,
    columns: &[String],
    batch: &[Row],
) -> Result<()> {
    match mode {
        StorageMode::JsonBlob => {
            let sql = json_insert_sql(table, batch.len());
            let mut query = sqlx::query(&sql);
            for row in batch {
                query = query.bind(serde_json::to_string(row)?);
            }
            query.execute(&mut **tx).await?;
        }
        StorageMode::Columnar => {
            let sql = columnar_insert_sql(table, columns, batch.len());
            let mut query = sqlx::query(&sql);
            for row in batch {
                for column in columns {
                    query = query.bind(row.get(column).and_then(render_text));
                }
            }
            query.execute(&mut **tx).await?;
        }
    }

    Ok(())
}
