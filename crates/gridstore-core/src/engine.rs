//! The Gridstore engine.
//!
//! [`Engine`] owns the connection pool and the configured table name and
//! exposes the full operation surface: whole-file and chunked import,
//! fetch-all, free-text search, structured filtering, and delete-by-ids.
//! Each request is handled independently; the only cross-request state is
//! the chunked-upload session used for generation checking and progress.

use parking_lot::Mutex;
use serde::Serialize;
use sqlx::mysql::MySqlPool;
use tracing::{debug, info};

use crate::dataset::{rebuild_table, require_meta, DatasetMeta};
use crate::error::{Error, Result};
use crate::filter::{where_clause, Filter};
use crate::ingest::{
    chunk_batch_size, default_batch_size, insert_rows, ChunkProgress, IngestPolicy, UploadChunk,
};
use crate::schema::{consistent_columns, quote_ident, Row, StorageMode, TablePlan};
use crate::store::{decode_row, rehydrate};

/// Summary of a completed whole-file import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Rows inserted.
    pub rows_inserted: u64,
    /// Logical column names, in upload order.
    pub columns: Vec<String>,
    /// Storage representation chosen for the dataset.
    pub mode: StorageMode,
}

/// Outcome of one processed chunk.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkReport {
    /// Rows inserted from this chunk.
    pub rows_in_chunk: usize,
    /// Upload progress after this chunk.
    pub progress: ChunkProgress,
}

/// In-flight chunked upload state.
struct ChunkSession {
    generation: u64,
    rows_processed: u64,
    total_rows: u64,
}

/// The dynamic-schema ingestion and query engine.
pub struct Engine {
    pool: MySqlPool,
    table: String,
    session: Mutex<Option<ChunkSession>>,
}

impl Engine {
    /// Creates an engine over `pool` targeting `table`.
    ///
    /// The table name is identifier-sanitized by stripping backticks.
    #[must_use]
    pub fn new(pool: MySqlPool, table: &str) -> Self {
        Self {
            pool,
            table: table.replace('`', ""),
            session: Mutex::new(None),
        }
    }

    /// The sanitized table name this engine targets.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Reads the active dataset's metadata.
    ///
    /// # Errors
    ///
    /// [`Error::NoDataset`] when nothing has been imported yet.
    pub async fn meta(&self) -> Result<DatasetMeta> {
        require_meta(&self.pool, &self.table).await
    }

    /// Fetches every row of the active dataset, rehydrated.
    pub async fn fetch_all(&self) -> Result<Vec<Row>> {
        let meta = self.meta().await?;
        self.fetch_all_in_mode(meta.mode).await
    }

    /// Imports a whole row set, replacing the previous dataset.
    ///
    /// Validates the column set, rebuilds the table per the inferred plan,
    /// then inserts in size-bounded groups under `policy`.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] on an empty row set and
    /// [`Error::InconsistentColumns`] on mixed column sets, both before any
    /// table mutation.
    pub async fn import(&self, rows: &[Row], policy: IngestPolicy) -> Result<ImportSummary> {
        let columns = consistent_columns(rows)?;
        let plan = TablePlan::for_rows(&columns, rows);
        let meta = rebuild_table(&self.pool, &self.table, &plan).await?;

        // A full import invalidates any in-flight chunked upload.
        *self.session.lock() = None;

        let batch_size = default_batch_size(meta.mode);
        let inserted = insert_rows(
            &self.pool,
            &self.table,
            meta.mode,
            &meta.columns,
            rows,
            batch_size,
            policy,
        )
        .await?;

        info!(
            table = %self.table,
            rows = inserted,
            mode = meta.mode.as_str(),
            "import complete"
        );

        Ok(ImportSummary {
            rows_inserted: inserted,
            columns: meta.columns,
            mode: meta.mode,
        })
    }

    /// Ingests one chunk of a pre-split upload.
    ///
    /// The first chunk rebuilds the table; later chunks append to the same
    /// generation, failing with [`Error::StaleGeneration`] if the table was
    /// rebuilt underneath them. The INSERT group size adapts to the
    /// dataset's column count.
    pub async fn import_chunk(&self, chunk: UploadChunk) -> Result<ChunkReport> {
        let columns = consistent_columns(&chunk.rows)?;

        let meta = if chunk.is_first_chunk {
            let plan = TablePlan::for_rows(&columns, &chunk.rows);
            let meta = rebuild_table(&self.pool, &self.table, &plan).await?;

            let estimate = (chunk.rows.len() * chunk.total_chunks.max(1)) as u64;
            *self.session.lock() = Some(ChunkSession {
                generation: meta.generation,
                rows_processed: 0,
                total_rows: estimate,
            });
            meta
        } else {
            let meta = self.meta().await?;
            let guard = self.session.lock();
            match guard.as_ref() {
                Some(session) if session.generation == meta.generation => {}
                Some(session) => {
                    return Err(Error::StaleGeneration {
                        expected: session.generation,
                        actual: meta.generation,
                    })
                }
                None => {
                    return Err(Error::Validation(
                        "No active chunked upload; resend from the first chunk".into(),
                    ))
                }
            }
            drop(guard);
            meta
        };

        let batch_size = chunk_batch_size(meta.columns.len(), default_batch_size(meta.mode));
        let inserted = insert_rows(
            &self.pool,
            &self.table,
            meta.mode,
            &meta.columns,
            &chunk.rows,
            batch_size,
            IngestPolicy::PerBatch,
        )
        .await?;

        let progress = {
            let mut guard = self.session.lock();
            let session = guard.as_mut().ok_or_else(|| {
                Error::Validation("No active chunked upload; resend from the first chunk".into())
            })?;
            session.rows_processed += inserted;

            let total_rows = if chunk.is_last_chunk {
                session.rows_processed
            } else {
                session.total_rows.max(session.rows_processed)
            };
            let percent =
                (chunk.chunk_index + 1) as f64 / chunk.total_chunks.max(1) as f64 * 100.0;
            let progress = ChunkProgress {
                chunk_index: chunk.chunk_index,
                total_chunks: chunk.total_chunks,
                percent,
                rows_processed: session.rows_processed,
                total_rows,
                batch_size,
            };

            if chunk.is_last_chunk {
                *guard = None;
            }
            progress
        };

        info!(
            table = %self.table,
            chunk = progress.chunk_index + 1,
            total = progress.total_chunks,
            percent = progress.percent,
            rows = progress.rows_processed,
            batch_size = progress.batch_size,
            "chunk ingested"
        );

        Ok(ChunkReport {
            rows_in_chunk: inserted as usize,
            progress,
        })
    }

    /// Free-text search across the dataset.
    ///
    /// Columnar mode ORs a substring match across every logical column;
    /// JSON mode substring-matches the raw serialized payload (which can
    /// match structural JSON characters, an accepted imprecision).
    pub async fn search(&self, query: &str) -> Result<Vec<Row>> {
        let meta = self.meta().await?;
        let needle = format!("%{query}%");

        match meta.mode {
            StorageMode::JsonBlob => {
                let sql = format!(
                    "SELECT * FROM {} WHERE json_data LIKE ?",
                    quote_ident(&self.table)
                );
                let rows = sqlx::query(&sql).bind(&needle).fetch_all(&self.pool).await?;
                rows.iter()
                    .map(|row| decode_row(row).and_then(rehydrate))
                    .collect()
            }
            StorageMode::Columnar => {
                let conditions: Vec<String> = meta
                    .columns
                    .iter()
                    .map(|c| format!("{} LIKE ?", quote_ident(c)))
                    .collect();
                let sql = format!(
                    "SELECT * FROM {} WHERE {}",
                    quote_ident(&self.table),
                    conditions.join(" OR ")
                );
                let mut q = sqlx::query(&sql);
                for _ in &meta.columns {
                    q = q.bind(&needle);
                }
                let rows = q.fetch_all(&self.pool).await?;
                rows.iter().map(decode_row).collect()
            }
        }
    }

    /// Applies a structured filter list (AND-combined) to the dataset.
    ///
    /// Columnar mode translates to a parameterized WHERE clause; JSON mode
    /// fetches everything and evaluates the predicates in process.
    pub async fn filter(&self, filters: &[Filter]) -> Result<Vec<Row>> {
        let meta = self.meta().await?;

        match meta.mode {
            StorageMode::JsonBlob => {
                let mut rows = self.fetch_all_in_mode(StorageMode::JsonBlob).await?;
                rows.retain(|row| filters.iter().all(|f| f.matches(row)));
                Ok(rows)
            }
            StorageMode::Columnar => {
                let base = format!("SELECT * FROM {}", quote_ident(&self.table));
                let (sql, params) = match where_clause(filters, &meta.columns)? {
                    Some((clause, params)) => (format!("{base} WHERE {clause}"), params),
                    None => (base, Vec::new()),
                };

                debug!(sql = %sql, "filter query");
                let mut q = sqlx::query(&sql);
                for param in &params {
                    q = q.bind(param);
                }
                let rows = q.fetch_all(&self.pool).await?;
                rows.iter().map(decode_row).collect()
            }
        }
    }

    /// Deletes the rows with the given ids.
    ///
    /// Returns the number of rows actually removed, which may be smaller
    /// than the id list when some ids do not exist.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the list is empty or any id is not a
    /// positive integer.
    pub async fn delete_by_ids(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Err(Error::Validation("No row IDs provided".into()));
        }
        if ids.iter().any(|id| *id <= 0) {
            return Err(Error::Validation("Invalid row IDs provided".into()));
        }

        let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
        let sql = format!(
            "DELETE FROM {} WHERE id IN ({})",
            quote_ident(&self.table),
            placeholders.join(", ")
        );

        let mut tx = self.pool.begin().await?;
        let mut q = sqlx::query(&sql);
        for id in ids {
            q = q.bind(id);
        }
        let result = q.execute(&mut *tx).await?;
        tx.commit().await?;

        info!(table = %self.table, deleted = result.rows_affected(), "rows deleted");
        Ok(result.rows_affected())
    }

    async fn fetch_all_in_mode(&self, mode: StorageMode) -> Result<Vec<Row>> {
        let sql = format!("SELECT * FROM {}", quote_ident(&self.table));
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                let decoded = decode_row(row)?;
                match mode {
                    StorageMode::JsonBlob => rehydrate(decoded),
                    StorageMode::Columnar => Ok(decoded),
                }
            })
            .collect()
    }
}
