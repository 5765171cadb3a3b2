//! Physical row decoding and JSON rehydration.
//!
//! Every data column the planner creates is a text tier, so decoding is
//! uniform: `id` as an integer, `created_at` through chrono, everything
//! else as nullable text. JSON-blob rows additionally carry their logical
//! columns inside `json_data`; rehydration merges those fields over the
//! physical row and drops the raw payload.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::{Column as _, Row as _};

use crate::error::Result;
use crate::schema::Row;

/// Decodes a physical row into a logical row map.
pub(crate) fn decode_row(row: &MySqlRow) -> Result<Row> {
    let mut map = Row::new();

    for column in row.columns() {
        let name = column.name();
        let value = match name {
            "id" => Value::from(row.try_get::<i64, _>(column.ordinal())?),
            "created_at" => row
                .try_get::<Option<DateTime<Utc>>, _>(column.ordinal())?
                .map_or(Value::Null, |ts| Value::String(ts.to_rfc3339())),
            _ => row
                .try_get::<Option<String>, _>(column.ordinal())?
                .map_or(Value::Null, Value::String),
        };
        map.insert(name.to_string(), value);
    }

    Ok(map)
}

/// Merges a JSON-blob row's payload fields over the physical row.
///
/// The raw `json_data` field is dropped from the result; payload fields win
/// over physical ones, matching the original service's spread order.
pub(crate) fn rehydrate(mut row: Row) -> Result<Row> {
    let Some(payload) = row.shift_remove("json_data") else {
        return Ok(row);
    };

    if let Value::String(text) = payload {
        let fields: Row = serde_json::from_str(&text)?;
        for (key, value) in fields {
            row.insert(key, value);
        }
    }

    Ok(row)
}
