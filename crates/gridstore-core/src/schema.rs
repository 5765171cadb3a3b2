//! Type inference and table planning.
//!
//! Every import derives a fresh physical schema from the data itself: a
//! capacity tier per column from sampled value lengths, and a storage
//! representation (one physical column per logical column, or a single
//! serialized JSON payload) from the column count. Everything here is pure
//! and unit-testable without a database.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A logical row: column name to scalar-or-null value.
pub type Row = Map<String, Value>;

/// Datasets wider than this are stored as a single JSON payload column.
///
/// Bounds physical column count and per-row byte width against MySQL's
/// per-table limits, which very wide uploads would otherwise hit.
pub const MAX_COLUMNS_PER_TABLE: usize = 50;

/// Number of leading rows sampled when inferring a column's capacity tier.
const TYPE_SAMPLE_ROWS: usize = 100;

/// Storage representation of the active dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageMode {
    /// One physical column per logical column.
    #[serde(rename = "columns")]
    Columnar,
    /// Physical columns are `id`, `json_data`, `created_at` only; logical
    /// columns live inside the serialized payload.
    #[serde(rename = "json")]
    JsonBlob,
}

impl StorageMode {
    /// Wire name of the mode (`"columns"` / `"json"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Columnar => "columns",
            Self::JsonBlob => "json",
        }
    }

    /// Parses the wire name back into a mode.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "columns" => Some(Self::Columnar),
            "json" => Some(Self::JsonBlob),
            _ => None,
        }
    }
}

/// Text-capacity tier of a columnar field.
///
/// No numeric or boolean inference is performed; every columnar field is a
/// text tier sized from sampled value lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Up to 100 sampled characters (also the all-null fallback).
    VarChar255,
    /// Up to 1000 sampled characters.
    VarChar1000,
    /// Up to 5000 sampled characters.
    Text,
    /// Up to 20000 sampled characters.
    MediumText,
    /// Anything larger.
    LongText,
}

impl ColumnType {
    /// Maps a maximum sampled value length to a capacity tier.
    #[must_use]
    pub fn for_max_len(max_len: usize) -> Self {
        match max_len {
            0..=100 => Self::VarChar255,
            101..=1000 => Self::VarChar1000,
            1001..=5000 => Self::Text,
            5001..=20000 => Self::MediumText,
            _ => Self::LongText,
        }
    }

    /// The MySQL type this tier maps to.
    #[must_use]
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::VarChar255 => "VARCHAR(255)",
            Self::VarChar1000 => "VARCHAR(1000)",
            Self::Text => "TEXT",
            Self::MediumText => "MEDIUMTEXT",
            Self::LongText => "LONGTEXT",
        }
    }
}

/// A planned physical column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name (as uploaded, backticks stripped).
    pub name: String,
    /// Inferred capacity tier.
    pub column_type: ColumnType,
}

/// The table definition an import will materialize.
#[derive(Debug, Clone)]
pub struct TablePlan {
    /// Chosen storage representation.
    pub mode: StorageMode,
    /// Logical column names, in upload order.
    pub columns: Vec<String>,
    /// Physical column definitions (columnar mode only).
    pub column_defs: Vec<ColumnDef>,
}

impl TablePlan {
    /// Plans the table for a validated row set.
    ///
    /// `columns` is the shared column set of `rows` (see
    /// [`consistent_columns`]). Column count decides the representation;
    /// in columnar mode each column gets a tier inferred from the first
    /// [`TYPE_SAMPLE_ROWS`] rows.
    #[must_use]
    pub fn for_rows(columns: &[String], rows: &[Row]) -> Self {
        if columns.len() > MAX_COLUMNS_PER_TABLE {
            return Self {
                mode: StorageMode::JsonBlob,
                columns: columns.to_vec(),
                column_defs: Vec::new(),
            };
        }

        let column_defs = columns
            .iter()
            .map(|name| ColumnDef {
                name: name.clone(),
                column_type: infer_column_type(name, rows),
            })
            .collect();

        Self {
            mode: StorageMode::Columnar,
            columns: columns.to_vec(),
            column_defs,
        }
    }

    /// Renders the `CREATE TABLE` statement for this plan.
    #[must_use]
    pub fn create_table_sql(&self, table: &str) -> String {
        match self.mode {
            StorageMode::JsonBlob => format!(
                "CREATE TABLE {} (\n  \
                   id INT AUTO_INCREMENT PRIMARY KEY,\n  \
                   json_data LONGTEXT NOT NULL,\n  \
                   created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,\n  \
                   INDEX idx_created (created_at)\n\
                 ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci",
                quote_ident(table)
            ),
            StorageMode::Columnar => {
                let definitions: Vec<String> = self
                    .column_defs
                    .iter()
                    .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type.sql_type()))
                    .collect();

                format!(
                    "CREATE TABLE {} (\n  \
                       id INT AUTO_INCREMENT PRIMARY KEY,\n  \
                       {},\n  \
                       created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP\n\
                     ) ENGINE=InnoDB ROW_FORMAT=DYNAMIC DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci",
                    quote_ident(table),
                    definitions.join(",\n  ")
                )
            }
        }
    }
}

/// Infers the capacity tier for one column from the leading sample rows.
///
/// The maximum rendered-text length among non-null values decides the tier;
/// a column with no non-null sample values lands in the smallest tier.
#[must_use]
pub fn infer_column_type(column: &str, rows: &[Row]) -> ColumnType {
    let max_len = rows
        .iter()
        .take(TYPE_SAMPLE_ROWS)
        .filter_map(|row| row.get(column))
        .filter_map(render_text)
        .map(|text| text.chars().count())
        .max()
        .unwrap_or(0);

    ColumnType::for_max_len(max_len)
}

/// Validates that every row shares the first row's column set and returns
/// that column set in upload order.
///
/// # Errors
///
/// [`Error::Validation`] when `rows` is empty or the first row has no
/// columns; [`Error::InconsistentColumns`] when any row deviates.
pub fn consistent_columns(rows: &[Row]) -> Result<Vec<String>> {
    let first = rows
        .first()
        .ok_or_else(|| Error::Validation("No data provided or invalid format".into()))?;

    let columns: Vec<String> = first.keys().cloned().collect();
    if columns.is_empty() {
        return Err(Error::Validation("Rows have no columns".into()));
    }

    let consistent = rows.iter().all(|row| {
        row.len() == columns.len() && row.keys().all(|key| first.contains_key(key))
    });

    if !consistent {
        return Err(Error::InconsistentColumns);
    }

    Ok(columns)
}

/// Renders a cell value the way it is persisted in a text column.
///
/// `None` for JSON null; numbers and booleans render as their JSON text;
/// nested arrays/objects fall back to their serialized form.
#[must_use]
pub fn render_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Quotes an identifier for interpolation into SQL, stripping any backticks
/// from the name itself.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', ""))
}
