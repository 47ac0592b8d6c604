//! Matrix loaders.
//!
//! Every supported input format is one variant of [`InputSource`]; the CLI
//! picks exactly one and [`load_matrix`] dispatches on it. Loaders hand back a
//! validated [`Matrix`], dense or sparse depending on the format.

pub mod coo;
pub mod csv;
pub mod json;
pub mod parquet;

use std::fmt;
use std::path::PathBuf;

use log::info;
use matquery_core::{CoreError, Matrix};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Csv(String),
    Json(String),
    Arrow(String),
    Parquet(String),
    Invalid(String),
    /// Wrong number of input sources selected.
    InvalidInput(String),
    /// Data parsed but does not form a valid matrix.
    Matrix(CoreError),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::Csv(e) => write!(f, "CSV error: {}", e),
            StorageError::Json(e) => write!(f, "JSON error: {}", e),
            StorageError::Arrow(e) => write!(f, "Arrow error: {}", e),
            StorageError::Parquet(e) => write!(f, "Parquet error: {}", e),
            StorageError::Invalid(e) => write!(f, "Invalid: {}", e),
            StorageError::InvalidInput(e) => write!(f, "Invalid input: {}", e),
            StorageError::Matrix(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for StorageError {
    fn from(e: CoreError) -> Self {
        StorageError::Matrix(e)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================================
// Input selection
// ============================================================================

/// One supported matrix source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Path to a JSON file, or literal JSON text.
    Json(String),
    /// Headerless numeric CSV file.
    Csv(PathBuf),
    /// Parquet file in the dense or sparse matrix layout.
    Parquet(PathBuf),
    /// Whitespace separated `row col value` triples.
    SparseCoo(PathBuf),
}

impl InputSource {
    /// Pick the single source among optional CLI values.
    ///
    /// Exactly one of the arguments must be set.
    pub fn from_options(
        json_data: Option<String>,
        csv_file: Option<PathBuf>,
        parquet_file: Option<PathBuf>,
        sparse_coo: Option<PathBuf>,
    ) -> StorageResult<Self> {
        let mut chosen: Vec<InputSource> = Vec::with_capacity(1);
        if let Some(v) = json_data {
            chosen.push(InputSource::Json(v));
        }
        if let Some(v) = csv_file {
            chosen.push(InputSource::Csv(v));
        }
        if let Some(v) = parquet_file {
            chosen.push(InputSource::Parquet(v));
        }
        if let Some(v) = sparse_coo {
            chosen.push(InputSource::SparseCoo(v));
        }

        if chosen.len() != 1 {
            return Err(StorageError::InvalidInput(format!(
                "exactly one input data type must be provided, got {}",
                chosen.len()
            )));
        }
        Ok(chosen.remove(0))
    }

    /// Option name as spelled on the command line, in snake case.
    pub fn kind(&self) -> &'static str {
        match self {
            InputSource::Json(_) => "json_data",
            InputSource::Csv(_) => "csv_file",
            InputSource::Parquet(_) => "parquet_file",
            InputSource::SparseCoo(_) => "sparse_coo",
        }
    }

    /// The raw option value.
    pub fn value(&self) -> String {
        match self {
            InputSource::Json(v) => v.clone(),
            InputSource::Csv(p) | InputSource::Parquet(p) | InputSource::SparseCoo(p) => {
                p.display().to_string()
            }
        }
    }
}

/// Load the matrix described by `source`.
pub fn load_matrix(source: &InputSource) -> StorageResult<Matrix> {
    let matrix = match source {
        InputSource::Json(value) => json::load_json(value)?,
        InputSource::Csv(path) => csv::load_csv(path)?,
        InputSource::Parquet(path) => parquet::load_matrix(path)?,
        InputSource::SparseCoo(path) => coo::load_coo(path)?,
    };
    let (rows, cols) = matrix.shape();
    info!(
        "Loaded {}x{} {} matrix from {}",
        rows,
        cols,
        if matrix.is_sparse() { "sparse" } else { "dense" },
        source.kind()
    );
    Ok(matrix)
}
