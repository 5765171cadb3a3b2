//! Filter translation and evaluation.
//!
//! A request carries an ordered list of [`Filter`]s combined with logical
//! AND. How a filter executes depends on the dataset's storage mode:
//! columnar datasets translate each operator into a parameterized SQL
//! fragment, JSON-blob datasets evaluate the filter in process against the
//! rehydrated payload with the loose coercion semantics of the original
//! service (case-insensitive substring ops, type-coercing equality,
//! `Number()`-style numeric comparison).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::{quote_ident, Row};

/// Filter operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Substring match (case-insensitive in JSON mode).
    Contains,
    /// Equality; loose (type-coercing) in JSON mode.
    Equals,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Null, missing, or empty string.
    IsEmpty,
    /// Neither null, missing, nor empty string.
    IsNotEmpty,
    /// Numeric comparison.
    GreaterThan,
    /// Numeric comparison.
    LessThan,
    /// Numeric comparison.
    GreaterThanOrEqual,
    /// Numeric comparison.
    LessThanOrEqual,
}

/// A single column predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    /// Column the predicate applies to.
    pub column: String,
    /// Comparison operator.
    pub operator: FilterOp,
    /// Comparison operand; unused by the emptiness operators.
    #[serde(default)]
    pub value: Option<String>,
}

impl Filter {
    fn operand(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Translates this filter into a SQL fragment plus its bind values.
    ///
    /// The column name is interpolated (identifier-quoted); callers must
    /// have validated it against the dataset's column list first.
    pub(crate) fn to_sql(&self) -> (String, Vec<String>) {
        let column = quote_ident(&self.column);
        let value = self.operand();

        match self.operator {
            FilterOp::Contains => (format!("{column} LIKE ?"), vec![format!("%{value}%")]),
            FilterOp::Equals => (format!("{column} = ?"), vec![value.to_string()]),
            FilterOp::StartsWith => (format!("{column} LIKE ?"), vec![format!("{value}%")]),
            FilterOp::EndsWith => (format!("{column} LIKE ?"), vec![format!("%{value}")]),
            FilterOp::IsEmpty => (format!("({column} IS NULL OR {column} = '')"), Vec::new()),
            FilterOp::IsNotEmpty => (
                format!("({column} IS NOT NULL AND {column} != '')"),
                Vec::new(),
            ),
            FilterOp::GreaterThan => (
                format!("CAST({column} AS DECIMAL) > ?"),
                vec![value.to_string()],
            ),
            FilterOp::LessThan => (
                format!("CAST({column} AS DECIMAL) < ?"),
                vec![value.to_string()],
            ),
            FilterOp::GreaterThanOrEqual => (
                format!("CAST({column} AS DECIMAL) >= ?"),
                vec![value.to_string()],
            ),
            FilterOp::LessThanOrEqual => (
                format!("CAST({column} AS DECIMAL) <= ?"),
                vec![value.to_string()],
            ),
        }
    }

    /// Evaluates this filter against a rehydrated row.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(&self.column);
        let value = self.operand();

        match self.operator {
            FilterOp::Contains => cell_text(cell)
                .to_lowercase()
                .contains(&value.to_lowercase()),
            FilterOp::Equals => loose_eq(cell, value),
            FilterOp::StartsWith => cell_text(cell)
                .to_lowercase()
                .starts_with(&value.to_lowercase()),
            FilterOp::EndsWith => cell_text(cell)
                .to_lowercase()
                .ends_with(&value.to_lowercase()),
            FilterOp::IsEmpty => is_empty_cell(cell),
            FilterOp::IsNotEmpty => !is_empty_cell(cell),
            FilterOp::GreaterThan => coerce_number(cell) > parse_number(value),
            FilterOp::LessThan => coerce_number(cell) < parse_number(value),
            FilterOp::GreaterThanOrEqual => coerce_number(cell) >= parse_number(value),
            FilterOp::LessThanOrEqual => coerce_number(cell) <= parse_number(value),
        }
    }
}

/// Builds the AND-joined WHERE clause for a columnar query.
///
/// Returns `None` when the filter list is empty (select everything). Every
/// filter column must appear in `columns`.
pub(crate) fn where_clause(
    filters: &[Filter],
    columns: &[String],
) -> Result<Option<(String, Vec<String>)>> {
    if filters.is_empty() {
        return Ok(None);
    }

    for filter in filters {
        if !columns.iter().any(|c| c == &filter.column) {
            return Err(Error::UnknownColumn(filter.column.clone()));
        }
    }

    let mut conditions = Vec::with_capacity(filters.len());
    let mut params = Vec::new();
    for filter in filters {
        let (fragment, binds) = filter.to_sql();
        conditions.push(fragment);
        params.extend(binds);
    }

    Ok(Some((conditions.join(" AND "), params)))
}

/// Renders a cell the way JavaScript's `String()` would, including the
/// `"undefined"` / `"null"` spellings for missing and null cells.
fn cell_text(cell: Option<&Value>) -> String {
    match cell {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn is_empty_cell(cell: Option<&Value>) -> bool {
    match cell {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Loose equality between a cell and a string operand.
///
/// Strings compare directly; numbers and booleans compare numerically
/// against the parsed operand, so `42` equals `"42"`.
fn loose_eq(cell: Option<&Value>, value: &str) -> bool {
    match cell {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => s == value,
        Some(Value::Number(n)) => n
            .as_f64()
            .is_some_and(|n| (n - parse_number(value)).abs() < f64::EPSILON),
        Some(Value::Bool(b)) => {
            let n = if *b { 1.0 } else { 0.0 };
            (n - parse_number(value)).abs() < f64::EPSILON
        }
        Some(_) => false,
    }
}

/// Numeric coercion of a cell, `Number()`-style: null coerces to 0, the
/// empty string to 0, missing or unparsable text to NaN (which makes every
/// comparison false).
fn coerce_number(cell: Option<&Value>) -> f64 {
    match cell {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::String(s)) => parse_number(s),
        Some(_) => f64::NAN,
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}
