//! Sparse coordinate (COO) input: one `row col value` triple per line.
//!
//! The matrix shape is inferred as `(max row + 1, max col + 1)` and
//! duplicate coordinates are summed when the triples are compressed to CSR.

use std::io::Read;
use std::path::Path;

use ::csv::{ReaderBuilder, Trim};
use log::debug;
use matquery_core::Matrix;

use crate::storage::{StorageError, StorageResult};

/// Read a CSR matrix from a whitespace separated triple file.
pub fn load_coo(path: impl AsRef<Path>) -> StorageResult<Matrix> {
    let file = std::fs::File::open(path.as_ref())
        .map_err(|e| StorageError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    read_coo(file)
}

pub fn read_coo<R: Read>(reader: R) -> StorageResult<Matrix> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b' ')
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut triplets: Vec<(usize, usize, f64)> = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| StorageError::Csv(e.to_string()))?;
        // runs of spaces show up as empty fields
        let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 3 {
            return Err(StorageError::Invalid(format!(
                "line {}: expected 'row col value', got {} fields",
                line,
                fields.len()
            )));
        }

        let row = parse_index(fields[0], line)?;
        let col = parse_index(fields[1], line)?;
        let value = fields[2].parse::<f64>().map_err(|e| {
            StorageError::Invalid(format!("line {}: value '{}': {}", line, fields[2], e))
        })?;
        triplets.push((row, col, value));
    }
    debug!("Parsed {} coordinate triples", triplets.len());

    Ok(Matrix::from_triplets(&triplets)?)
}

/// Indices may be written as integers or as integral floats (`3.0`).
fn parse_index(field: &str, line: usize) -> StorageResult<usize> {
    if let Ok(idx) = field.parse::<usize>() {
        return Ok(idx);
    }
    match field.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v.is_finite() => Ok(v as usize),
        _ => Err(StorageError::Invalid(format!(
            "line {}: '{}' is not a non-negative integer index",
            line, field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_accepts_integral_floats() {
        assert_eq!(parse_index("3", 0).unwrap(), 3);
        assert_eq!(parse_index("3.0", 0).unwrap(), 3);
        assert!(parse_index("-1", 0).is_err());
        assert!(parse_index("1.5", 0).is_err());
    }
}
