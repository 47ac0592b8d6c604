//! # matquery
//!
//! Load a matrix from CSV, JSON, sparse COO or Parquet and answer geometric
//! queries about its rows: nearest row to a reference row, the closest or
//! furthest distinct pairs, and k-means centroids.
//!
//! The distance engine and pair ranking live in [`matquery_core`]; this
//! crate adds the loaders, the centroid extractor, query configuration,
//! output rendering and the `matquery` binary.
//!
//! ```no_run
//! use matquery::clustering::{extract_centroids, KMeansCenters};
//! use matquery::storage::{load_matrix, InputSource};
//!
//! let source = InputSource::Json("data/test.json".to_string());
//! let matrix = load_matrix(&source).unwrap();
//! let centers = extract_centroids(&matrix, 3, &KMeansCenters::default()).unwrap();
//! assert_eq!(centers.len(), 3);
//! ```

pub mod clustering;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod storage;

#[cfg(test)]
mod tests;

pub use clustering::{canonical_order, extract_centroids, ClusterCenters, KMeansCenters};
pub use commands::{run, Query};
pub use config::QueryConfig;
pub use error::{Error, Result};
pub use storage::{InputSource, StorageError};
