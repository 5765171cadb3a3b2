//! Dataset metadata and table rebuilding.
//!
//! The active dataset's storage mode, column list, and rebuild generation
//! are persisted in a single-record sidecar table (`{table}_meta`). Request
//! handling reads this record once instead of introspecting
//! `INFORMATION_SCHEMA` on every call, and chunked uploads compare
//! generations to detect a rebuild that happened mid-upload.

use sqlx::mysql::MySqlPool;
use sqlx::Row as _;
use tracing::info;

use crate::error::{Error, Result};
use crate::schema::{quote_ident, StorageMode, TablePlan};

/// Metadata of the currently active dataset.
#[derive(Debug, Clone)]
pub struct DatasetMeta {
    /// Storage representation of the live table.
    pub mode: StorageMode,
    /// Rebuild counter; incremented by every table rebuild, never reused.
    pub generation: u64,
    /// Logical column names, in upload order.
    pub columns: Vec<String>,
}

/// Name of the sidecar metadata table for `table`.
fn meta_table(table: &str) -> String {
    format!("{table}_meta")
}

/// Reads the dataset metadata record, if a dataset exists.
///
/// A missing metadata table reads as `None` (nothing was ever imported).
pub(crate) async fn read_meta(pool: &MySqlPool, table: &str) -> Result<Option<DatasetMeta>> {
    let sql = format!(
        "SELECT storage_mode, generation, columns FROM {} WHERE id = 1",
        quote_ident(&meta_table(table))
    );

    let row = match sqlx::query(&sql).fetch_optional(pool).await {
        Ok(row) => row,
        // 42S02: table doesn't exist
        Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("42S02") => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let Some(row) = row else {
        return Ok(None);
    };

    let mode_text: String = row.try_get("storage_mode")?;
    let mode = StorageMode::parse(&mode_text).ok_or(Error::NoDataset)?;
    let generation: u64 = row.try_get("generation")?;
    let columns_json: String = row.try_get("columns")?;
    let columns: Vec<String> = serde_json::from_str(&columns_json)?;

    Ok(Some(DatasetMeta {
        mode,
        generation,
        columns,
    }))
}

/// Reads the dataset metadata record, failing when no dataset exists.
pub(crate) async fn require_meta(pool: &MySqlPool, table: &str) -> Result<DatasetMeta> {
    read_meta(pool, table).await?.ok_or(Error::NoDataset)
}

/// Drops the previous dataset's table and creates the new one per `plan`,
/// then persists the metadata record with an incremented generation.
///
/// MySQL DDL is not transactional with row DML, so the rebuild is its own
/// earlier commit point: it either completes before any row data is
/// accepted, or the import aborts with no partial state.
pub(crate) async fn rebuild_table(
    pool: &MySqlPool,
    table: &str,
    plan: &TablePlan,
) -> Result<DatasetMeta> {
    let generation = read_meta(pool, table)
        .await?
        .map_or(1, |meta| meta.generation + 1);

    let mut conn = pool.acquire().await?;

    let drop_sql = format!("DROP TABLE IF EXISTS {}", quote_ident(table));
    sqlx::query(&drop_sql).execute(&mut *conn).await?;
    sqlx::query(&plan.create_table_sql(table))
        .execute(&mut *conn)
        .await?;

    let meta_ddl = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  \
           id TINYINT PRIMARY KEY,\n  \
           storage_mode VARCHAR(16) NOT NULL,\n  \
           generation BIGINT UNSIGNED NOT NULL,\n  \
           columns LONGTEXT NOT NULL,\n  \
           updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP\n\
         ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci",
        quote_ident(&meta_table(table))
    );
    sqlx::query(&meta_ddl).execute(&mut *conn).await?;

    let upsert = format!(
        "REPLACE INTO {} (id, storage_mode, generation, columns) VALUES (1, ?, ?, ?)",
        quote_ident(&meta_table(table))
    );
    sqlx::query(&upsert)
        .bind(plan.mode.as_str())
        .bind(generation)
        .bind(serde_json::to_string(&plan.columns)?)
        .execute(&mut *conn)
        .await?;

    info!(
        table,
        mode = plan.mode.as_str(),
        generation,
        columns = plan.columns.len(),
        "rebuilt dataset table"
    );

    Ok(DatasetMeta {
        mode: plan.mode,
        generation,
        columns: plan.columns.clone(),
    })
}
