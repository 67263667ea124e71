//! Tabular data views and their conversions.
//!
//! Grid data has two interchangeable representations: the raw hierarchical
//! JSON value (top level: array of row arrays) and a normalized list of
//! rows-of-strings. Converting to the normalized view coerces every scalar
//! to its string form; shape is preserved exactly in both directions.

use serde_json::Value;

use crate::error::DecodeError;

/// String form of a single cell value.
///
/// Scalars coerce to their text form (5 → "5", true → "true", null → "");
/// nested arrays/objects coerce to compact JSON text.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Convert the raw data value into the rows-of-strings view.
///
/// The top level must be an array of row arrays.
pub fn rows_from_value(value: &Value) -> Result<Vec<Vec<String>>, DecodeError> {
    let rows = value
        .as_array()
        .ok_or_else(|| DecodeError::Shape("top-level value is not an array".to_string()))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let cells = row.as_array().ok_or(DecodeError::Element {
                index,
                message: "row is not an array".to_string(),
            })?;
            Ok(cells.iter().map(cell_text).collect())
        })
        .collect()
}

/// Convert rows-of-strings back into a raw data value.
pub fn rows_to_value(rows: &[Vec<String>]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                Value::Array(
                    row.iter()
                        .map(|cell| Value::String(cell.clone()))
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Decode a raw data payload. The top level must be an array.
pub fn decode_data(payload: &str) -> Result<Value, DecodeError> {
    let value: Value = serde_json::from_str(payload).map_err(DecodeError::from_serde)?;
    if !value.is_array() {
        return Err(DecodeError::Shape(
            "data payload is not a JSON array".to_string(),
        ));
    }
    Ok(value)
}

/// Decode a data payload directly into the rows-of-strings view.
pub fn decode_rows(payload: &str) -> Result<Vec<Vec<String>>, DecodeError> {
    rows_from_value(&decode_data(payload)?)
}

/// Encode a data value as JSON text for the boundary.
pub fn encode_data(value: &Value) -> String {
    value.to_string()
}
