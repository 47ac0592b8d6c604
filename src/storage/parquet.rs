use arrow::{
    array::{Array as _, ArrayRef, Float64Array, RecordBatch, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
};
use log::{debug, info};
use ::parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    basic::Compression,
    file::properties::WriterProperties,
};
use matquery_core::{Matrix, MAX_TRIPLET_INDEX};
use smartcore::linalg::basic::{arrays::Array, matrix::DenseMatrix};
use sprs::{CsMat, TriMat};
use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::storage::{StorageError, StorageResult};

// ============================================================================
// Layout
// ============================================================================
//
// Dense:  name_id | n_rows | n_cols | col_0 .. col_{D-1}    (one row per matrix row)
// Sparse: name_id | n_rows | n_cols | nnz | row | col | value (one row per stored entry)

/// Write `matrix` to `<dir>/<name_id>.parquet` in the layout matching its
/// representation. Returns the written path.
pub fn save_matrix(
    matrix: &Matrix,
    dir: impl AsRef<Path>,
    name_id: &str,
) -> StorageResult<PathBuf> {
    match matrix {
        Matrix::Dense(m) => save_dense_matrix(m, dir, name_id),
        Matrix::Sparse(m) => save_sparse_matrix(m, dir, name_id),
    }
}

fn write_batch(path: &Path, schema: Arc<Schema>, batch: RecordBatch) -> StorageResult<()> {
    let file = File::create(path).map_err(|e| StorageError::Io(e.to_string()))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema, Some(props))
        .map_err(|e| StorageError::Parquet(e.to_string()))?;

    writer
        .write(&batch)
        .map_err(|e| StorageError::Parquet(e.to_string()))?;

    writer
        .close()
        .map_err(|e| StorageError::Parquet(e.to_string()))?;

    Ok(())
}

/// Save a DenseMatrix to Parquet
pub fn save_dense_matrix(
    matrix: &DenseMatrix<f64>,
    dir: impl AsRef<Path>,
    name_id: &str,
) -> StorageResult<PathBuf> {
    let (n_rows, n_cols) = matrix.shape();

    let mut fields = vec![
        Field::new("name_id", DataType::Utf8, false),
        Field::new("n_rows", DataType::UInt64, false),
        Field::new("n_cols", DataType::UInt64, false),
    ];
    for i in 0..n_cols {
        fields.push(Field::new(format!("col_{}", i), DataType::Float64, false));
    }
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![name_id; n_rows])),
        Arc::new(UInt64Array::from(vec![n_rows as u64; n_rows])),
        Arc::new(UInt64Array::from(vec![n_cols as u64; n_rows])),
    ];
    for col_idx in 0..n_cols {
        let col_data: Vec<f64> = (0..n_rows)
            .map(|row_idx| *matrix.get((row_idx, col_idx)))
            .collect();
        columns.push(Arc::new(Float64Array::from(col_data)));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns)
        .map_err(|e| StorageError::Arrow(e.to_string()))?;

    let file_path = dir.as_ref().join(format!("{}.parquet", name_id));
    write_batch(&file_path, schema, batch)?;
    info!(
        "Saved dense {}x{} matrix to {}",
        n_rows,
        n_cols,
        file_path.display()
    );
    Ok(file_path)
}

/// Save a CSR matrix to Parquet as COO triples
pub fn save_sparse_matrix(
    matrix: &CsMat<f64>,
    dir: impl AsRef<Path>,
    name_id: &str,
) -> StorageResult<PathBuf> {
    let (n_rows, n_cols) = matrix.shape();
    let nnz = matrix.nnz();

    let mut rows = Vec::with_capacity(nnz);
    let mut cols = Vec::with_capacity(nnz);
    let mut vals = Vec::with_capacity(nnz);
    for (&value, (row_idx, col_idx)) in matrix.iter() {
        rows.push(row_idx as u64);
        cols.push(col_idx as u64);
        vals.push(value);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("name_id", DataType::Utf8, false),
        Field::new("n_rows", DataType::UInt64, false),
        Field::new("n_cols", DataType::UInt64, false),
        Field::new("nnz", DataType::UInt64, false),
        Field::new("row", DataType::UInt64, false),
        Field::new("col", DataType::UInt64, false),
        Field::new("value", DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![name_id; nnz])),
        Arc::new(UInt64Array::from(vec![n_rows as u64; nnz])),
        Arc::new(UInt64Array::from(vec![n_cols as u64; nnz])),
        Arc::new(UInt64Array::from(vec![nnz as u64; nnz])),
        Arc::new(UInt64Array::from(rows)),
        Arc::new(UInt64Array::from(cols)),
        Arc::new(Float64Array::from(vals)),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns)
        .map_err(|e| StorageError::Arrow(e.to_string()))?;

    let file_path = dir.as_ref().join(format!("{}.parquet", name_id));
    write_batch(&file_path, schema, batch)?;
    info!(
        "Saved sparse {}x{} matrix ({} non-zeros) to {}",
        n_rows,
        n_cols,
        nnz,
        file_path.display()
    );
    Ok(file_path)
}

// ============================================================================
// Loading
// ============================================================================

/// Load a matrix, choosing the dense or sparse reader from the file schema.
pub fn load_matrix(path: impl AsRef<Path>) -> StorageResult<Matrix> {
    let file = File::open(path.as_ref())
        .map_err(|e| StorageError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| StorageError::Parquet(e.to_string()))?;

    let is_sparse = builder.schema().field_with_name("value").is_ok();
    debug!(
        "Parquet schema for {} is {}",
        path.as_ref().display(),
        if is_sparse { "sparse" } else { "dense" }
    );

    if is_sparse {
        Ok(Matrix::sparse(load_sparse_matrix(path)?)?)
    } else {
        Ok(Matrix::from_rows(load_dense_rows(path)?)?)
    }
}

fn u64_column<'a>(batch: &'a RecordBatch, name: &str) -> StorageResult<&'a UInt64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<UInt64Array>())
        .ok_or_else(|| StorageError::Invalid(format!("{} column missing", name)))
}

fn f64_column<'a>(batch: &'a RecordBatch, name: &str) -> StorageResult<&'a Float64Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| StorageError::Invalid(format!("{} column missing", name)))
}

/// Load the rows of a dense-layout Parquet file.
pub fn load_dense_rows(path: impl AsRef<Path>) -> StorageResult<Vec<Vec<f64>>> {
    let file = File::open(path.as_ref()).map_err(|e| StorageError::Io(e.to_string()))?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| StorageError::Parquet(e.to_string()))?
        .build()
        .map_err(|e| StorageError::Parquet(e.to_string()))?;

    let mut dims: Option<(usize, usize)> = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| StorageError::Parquet(e.to_string()))?;
        if batch.num_rows() == 0 {
            continue;
        }

        // Extract dimensions from first batch
        let (_, n_cols) = match dims {
            Some(d) => d,
            None => {
                let d = (
                    u64_column(&batch, "n_rows")?.value(0) as usize,
                    u64_column(&batch, "n_cols")?.value(0) as usize,
                );
                dims = Some(d);
                d
            }
        };

        let columns = (0..n_cols)
            .map(|c| f64_column(&batch, &format!("col_{}", c)))
            .collect::<StorageResult<Vec<&Float64Array>>>()?;

        for r in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col.value(r)).collect());
        }
    }

    let (n_rows, _) =
        dims.ok_or_else(|| StorageError::Invalid("No data in parquet file".to_string()))?;

    if rows.len() != n_rows {
        return Err(StorageError::Invalid(format!(
            "Parquet file contained {} rows, but metadata claimed {}",
            rows.len(),
            n_rows
        )));
    }
    Ok(rows)
}

/// Load a sparse matrix from Parquet
///
/// Reconstructs CSR matrix from COO triplets.
pub fn load_sparse_matrix(path: impl AsRef<Path>) -> StorageResult<CsMat<f64>> {
    let file = File::open(path.as_ref()).map_err(|e| StorageError::Io(e.to_string()))?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| StorageError::Parquet(e.to_string()))?
        .build()
        .map_err(|e| StorageError::Parquet(e.to_string()))?;

    let mut trimat: Option<TriMat<f64>> = None;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| StorageError::Parquet(e.to_string()))?;
        if batch.num_rows() == 0 {
            continue;
        }

        if trimat.is_none() {
            let n_rows = u64_column(&batch, "n_rows")?.value(0) as usize;
            let n_cols = u64_column(&batch, "n_cols")?.value(0) as usize;
            if n_rows > MAX_TRIPLET_INDEX || n_cols > MAX_TRIPLET_INDEX {
                return Err(StorageError::Invalid(format!(
                    "declared shape {}x{} exceeds the index limit {}",
                    n_rows, n_cols, MAX_TRIPLET_INDEX
                )));
            }
            trimat = Some(TriMat::new((n_rows, n_cols)));
        }
        let Some(tm) = trimat.as_mut() else {
            continue;
        };
        let (n_rows, n_cols) = (tm.rows(), tm.cols());

        let row_col = u64_column(&batch, "row")?;
        let col_col = u64_column(&batch, "col")?;
        let val_col = f64_column(&batch, "value")?;

        for i in 0..row_col.len() {
            let (r, c) = (row_col.value(i) as usize, col_col.value(i) as usize);
            if r >= n_rows || c >= n_cols {
                return Err(StorageError::Invalid(format!(
                    "entry ({}, {}) outside declared shape {}x{}",
                    r, c, n_rows, n_cols
                )));
            }
            tm.add_triplet(r, c, val_col.value(i));
        }
    }

    trimat
        .ok_or_else(|| StorageError::Invalid("No data in parquet file".to_string()))
        .map(|tm| tm.to_csr())
}
