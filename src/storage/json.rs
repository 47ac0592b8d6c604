//! JSON input, from a file or from literal text.
//!
//! Accepted layouts:
//! - rows: `[[1, 2], [3, 4]]`
//! - records: `[{"a": 1, "b": 2}, {"a": 3, "b": 4}]`
//! - columns: `{"a": {"0": 1, "1": 3}, "b": {"0": 2, "1": 4}}` (also with
//!   arrays as column values)
//!
//! Object keys that are all integers are ordered numerically, otherwise
//! document order is kept.

use std::path::Path;

use log::{debug, trace};
use matquery_core::{CoreError, Matrix};
use serde_json::{Map, Value};

use crate::storage::{StorageError, StorageResult};

/// Load from a path when `value` names an existing file, otherwise parse
/// `value` itself as JSON.
pub fn load_json(value: &str) -> StorageResult<Matrix> {
    let path = Path::new(value);
    let text = if path.is_file() {
        debug!("Reading JSON matrix from {}", path.display());
        std::fs::read_to_string(path)
            .map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?
    } else {
        trace!("Treating JSON argument as literal text");
        value.to_string()
    };
    parse_json(&text)
}

pub fn parse_json(text: &str) -> StorageResult<Matrix> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| StorageError::Json(e.to_string()))?;
    let rows = match &value {
        Value::Array(items) if items.iter().all(Value::is_array) => rows_from_arrays(items)?,
        Value::Array(items) if items.iter().all(Value::is_object) => rows_from_records(items)?,
        Value::Object(columns) => rows_from_columns(columns)?,
        _ => {
            return Err(StorageError::Invalid(
                "expected an array of rows, an array of records or an object of columns"
                    .to_string(),
            ))
        }
    };
    Ok(Matrix::from_rows(rows)?)
}

fn number(value: &Value, at: impl FnOnce() -> String) -> StorageResult<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            StorageError::Invalid(format!("{}: number out of range", at()))
        }),
        Value::Null => Err(CoreError::MalformedMatrix(format!("{}: missing value", at())).into()),
        other => Err(StorageError::Invalid(format!(
            "{}: expected a number, got {}",
            at(),
            other
        ))),
    }
}

fn rows_from_arrays(items: &[Value]) -> StorageResult<Vec<Vec<f64>>> {
    items
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_array()
                .map(|cells| {
                    cells
                        .iter()
                        .enumerate()
                        .map(|(j, v)| number(v, || format!("row {}, column {}", i, j)))
                        .collect::<StorageResult<Vec<f64>>>()
                })
                .unwrap_or_else(|| Err(StorageError::Invalid(format!("row {} is not an array", i))))
        })
        .collect()
}

fn rows_from_records(items: &[Value]) -> StorageResult<Vec<Vec<f64>>> {
    let first = match items.first().and_then(Value::as_object) {
        Some(obj) => obj,
        None => return Ok(Vec::new()),
    };
    let keys = ordered_keys(first);

    let mut rows = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let record = item
            .as_object()
            .ok_or_else(|| StorageError::Invalid(format!("record {} is not an object", i)))?;
        if record.len() != keys.len() {
            return Err(CoreError::MalformedMatrix(format!(
                "record {} has {} fields, expected {}",
                i,
                record.len(),
                keys.len()
            ))
            .into());
        }
        let row = keys
            .iter()
            .map(|k| {
                let v = record.get(k.as_str()).unwrap_or(&Value::Null);
                number(v, || format!("record {}, field '{}'", i, k))
            })
            .collect::<StorageResult<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

fn rows_from_columns(columns: &Map<String, Value>) -> StorageResult<Vec<Vec<f64>>> {
    let col_keys = ordered_keys(columns);
    let mut cols: Vec<Vec<f64>> = Vec::with_capacity(col_keys.len());

    let mut row_keys: Option<Vec<String>> = None;
    for ck in &col_keys {
        let column = &columns[ck.as_str()];
        let values = match column {
            Value::Array(cells) => cells
                .iter()
                .enumerate()
                .map(|(r, v)| number(v, || format!("column '{}', row {}", ck, r)))
                .collect::<StorageResult<Vec<f64>>>()?,
            Value::Object(cells) => {
                let keys = row_keys.get_or_insert_with(|| ordered_keys(cells));
                if cells.len() != keys.len() {
                    return Err(CoreError::MalformedMatrix(format!(
                        "column '{}' has {} rows, expected {}",
                        ck,
                        cells.len(),
                        keys.len()
                    ))
                    .into());
                }
                keys.iter()
                    .map(|rk| {
                        let v = cells.get(rk.as_str()).unwrap_or(&Value::Null);
                        number(v, || format!("column '{}', row '{}'", ck, rk))
                    })
                    .collect::<StorageResult<Vec<f64>>>()?
            }
            other => {
                return Err(StorageError::Invalid(format!(
                    "column '{}' must be an array or object, got {}",
                    ck, other
                )))
            }
        };
        cols.push(values);
    }

    // transpose columns into rows
    let nrows = cols.first().map_or(0, Vec::len);
    if let Some((ck, c)) = col_keys.iter().zip(&cols).find(|(_, c)| c.len() != nrows) {
        return Err(CoreError::MalformedMatrix(format!(
            "column '{}' has {} rows, expected {}",
            ck,
            c.len(),
            nrows
        ))
        .into());
    }
    Ok((0..nrows)
        .map(|r| cols.iter().map(|c| c[r]).collect())
        .collect())
}

/// Object keys in matrix order: numeric when every key is an integer,
/// document order otherwise.
fn ordered_keys(obj: &Map<String, Value>) -> Vec<String> {
    let mut keys: Vec<String> = obj.keys().cloned().collect();
    let numeric: Option<Vec<i64>> = keys.iter().map(|k| k.parse::<i64>().ok()).collect();
    if let Some(nums) = numeric {
        let mut paired: Vec<(i64, String)> = nums.into_iter().zip(keys).collect();
        paired.sort_by_key(|(n, _)| *n);
        keys = paired.into_iter().map(|(_, k)| k).collect();
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_keys_sorted() {
        let v: Value = serde_json::from_str(r#"{"10": 1, "2": 2, "0": 3}"#).unwrap();
        let keys = ordered_keys(v.as_object().unwrap());
        assert_eq!(keys, vec!["0", "2", "10"]);
    }

    #[test]
    fn test_named_keys_keep_document_order() {
        let v: Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let keys = ordered_keys(v.as_object().unwrap());
        assert_eq!(keys, vec!["b", "a"]);
    }
}
