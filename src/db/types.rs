//! SQLite value decoding.
//!
//! SQLite is dynamically typed: a column's declared type says little about the
//! value stored in a given row. Cells are therefore decoded from the storage
//! class of the value itself:
//! 1. `StorageClass` classifies the runtime type reported by the engine
//! 2. the matching decoder turns the cell into a JSON value

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value as JsonValue;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Runtime storage class of a SQLite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl StorageClass {
    /// Classify a type name reported by the driver.
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name.to_ascii_uppercase().as_str() {
            "NULL" => Self::Null,
            "INTEGER" | "BOOLEAN" => Self::Integer,
            "REAL" => Self::Real,
            "BLOB" => Self::Blob,
            _ => Self::Text,
        }
    }
}

/// Render binary data as text when it is valid UTF-8, base64 otherwise.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

/// Column names of a row, in result order.
pub fn column_names(row: &SqliteRow) -> Vec<String> {
    row.columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect()
}

/// Decode every cell of a row, in column order.
pub fn row_values(row: &SqliteRow) -> Vec<JsonValue> {
    (0..row.len()).map(|idx| decode_column(row, idx)).collect()
}

fn decode_column(row: &SqliteRow, idx: usize) -> JsonValue {
    let class = match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => return JsonValue::Null,
        Ok(value) => StorageClass::from_type_name(value.type_info().name()),
        Err(_) => return JsonValue::Null,
    };

    match class {
        StorageClass::Null => JsonValue::Null,
        StorageClass::Integer => decode_integer(row, idx),
        StorageClass::Real => decode_real(row, idx),
        StorageClass::Blob => decode_blob(row, idx),
        StorageClass::Text => decode_text(row, idx),
    }
}

fn decode_integer(row: &SqliteRow, idx: usize) -> JsonValue {
    row.try_get::<i64, _>(idx)
        .map(|v| JsonValue::Number(v.into()))
        .unwrap_or_else(|_| decode_text(row, idx))
}

fn decode_real(row: &SqliteRow, idx: usize) -> JsonValue {
    match row.try_get::<f64, _>(idx) {
        // NaN and infinities have no JSON number form
        Ok(v) => serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string())),
        Err(_) => decode_text(row, idx),
    }
}

fn decode_blob(row: &SqliteRow, idx: usize) -> JsonValue {
    row.try_get::<Vec<u8>, _>(idx)
        .map(|bytes| decode_binary_value(&bytes))
        .unwrap_or(JsonValue::Null)
}

fn decode_text(row: &SqliteRow, idx: usize) -> JsonValue {
    row.try_get::<String, _>(idx)
        .map(JsonValue::String)
        .unwrap_or(JsonValue::Null)
}
