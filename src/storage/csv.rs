//! Headerless numeric CSV input.

use std::io::Read;
use std::path::Path;

use ::csv::{ReaderBuilder, Trim};
use log::debug;
use matquery_core::Matrix;

use crate::storage::{StorageError, StorageResult};

/// Read a dense matrix from a CSV file with no header row.
pub fn load_csv(path: impl AsRef<Path>) -> StorageResult<Matrix> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| StorageError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    read_csv(file)
}

/// Parse CSV rows from any reader. Rows of different lengths are reported as
/// a malformed matrix rather than a CSV error.
pub fn read_csv<R: Read>(reader: R) -> StorageResult<Matrix> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| StorageError::Csv(e.to_string()))?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|e| {
                    StorageError::Csv(format!(
                        "record {}, field {}: '{}': {}",
                        line, col, field, e
                    ))
                })
            })
            .collect::<StorageResult<Vec<f64>>>()?;
        rows.push(row);
    }
    debug!("Parsed {} CSV records", rows.len());

    Ok(Matrix::from_rows(rows)?)
}
