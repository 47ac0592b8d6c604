//! Subcommand execution.
//!
//! Each query loads the matrix once, runs the core operation and writes its
//! lines to the given writer. The binary passes stdout; tests pass a buffer.

use std::io::Write;
use std::path::PathBuf;

use log::{debug, info};
use matquery_core::{closest_pairs, furthest_pairs, nearest_row, pairwise_distances, Matrix};

use crate::clustering::extract_centroids;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::render::{centroid_line, pair_line, render_matrix};
use crate::storage::{load_matrix, parquet::save_matrix, InputSource, StorageError};

/// One query against the loaded matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Print the matrix
    PrintMat,
    /// Print the input kind and value `times` times
    Echo { times: usize },
    /// Nearest other row to `row`
    ClosestTo { row: usize },
    /// `n` closest distinct row pairs
    Closest { n: usize },
    /// `n` furthest distinct row pairs
    Furthest { n: usize },
    /// `n` k-means centroids
    Centroids { n: usize },
    /// Write the matrix to `<out_dir>/<name>.parquet`
    Convert { out_dir: PathBuf, name: String },
}

fn io_err(e: std::io::Error) -> StorageError {
    StorageError::Io(e.to_string())
}

/// Run `query` on `source` and write the result lines to `out`.
pub fn run(
    query: &Query,
    source: &InputSource,
    config: &QueryConfig,
    out: &mut impl Write,
) -> Result<()> {
    debug!("Running {:?} with {}", query, config);

    if let Query::Echo { times } = query {
        for _ in 0..*times {
            writeln!(out, "The given input was of type: {}", source.kind()).map_err(io_err)?;
            writeln!(out, "And the value was: {}", source.value()).map_err(io_err)?;
        }
        return Ok(());
    }

    let matrix = load_matrix(source)?;
    run_on_matrix(query, &matrix, config, out)
}

/// Run `query` on an already loaded matrix.
pub fn run_on_matrix(
    query: &Query,
    matrix: &Matrix,
    config: &QueryConfig,
    out: &mut impl Write,
) -> Result<()> {
    match query {
        Query::PrintMat => {
            writeln!(out, "{}", render_matrix(matrix)).map_err(io_err)?;
        }
        Query::Echo { .. } => {}
        Query::ClosestTo { row } => {
            let pair = nearest_row(matrix, *row, config.metric)?;
            writeln!(out, "{}", pair_line(&pair, config.show_distance)).map_err(io_err)?;
        }
        Query::Closest { n } | Query::Furthest { n } => {
            let dist = pairwise_distances(matrix, config.metric)?;
            let pairs = if matches!(query, Query::Closest { .. }) {
                closest_pairs(&dist, *n)?
            } else {
                furthest_pairs(&dist, *n)?
            };
            for pair in &pairs {
                writeln!(out, "{}", pair_line(pair, config.show_distance)).map_err(io_err)?;
            }
        }
        Query::Centroids { n } => {
            let centers = extract_centroids(matrix, *n, &config.kmeans())?;
            for center in &centers {
                writeln!(out, "{}", centroid_line(center)).map_err(io_err)?;
            }
        }
        Query::Convert { out_dir, name } => {
            let path = save_matrix(matrix, out_dir, name)?;
            info!("Converted matrix written to {}", path.display());
            writeln!(out, "{}", path.display()).map_err(io_err)?;
        }
    }
    Ok(())
}
