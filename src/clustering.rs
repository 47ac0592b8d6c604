//! Cluster centroids for a loaded matrix.
//!
//! The clustering itself is behind [`ClusterCenters`]; [`KMeansCenters`] is the
//! shipped implementation on top of `smartcore`'s k-means. Whatever the
//! implementation returns, [`extract_centroids`] puts the centres in a
//! canonical order so repeated runs print the same lines.
//!
//! **DETERMINISTIC**: k-means runs with a fixed seed (default 128).

use std::cmp::Ordering;

use log::{debug, info, trace};
use matquery_core::{CoreError, CoreResult, Matrix};
use smartcore::cluster::kmeans::{KMeans, KMeansParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;

pub const DEFAULT_SEED: u64 = 128;
pub const DEFAULT_MAX_ITER: usize = 100;

/// A clustering capability: given a matrix and a cluster count, return one
/// centre per cluster, in any order.
pub trait ClusterCenters {
    fn centers(&self, matrix: &Matrix, k: usize) -> CoreResult<Vec<Vec<f64>>>;
}

/// K-means with a fixed seed. Centres are the means of the rows assigned to
/// each label by the fitted model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KMeansCenters {
    pub seed: u64,
    pub max_iter: usize,
}

impl Default for KMeansCenters {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl KMeansCenters {
    pub fn new(seed: u64, max_iter: usize) -> Self {
        Self { seed, max_iter }
    }

    /// Fit k-means and return one label per row.
    pub fn labels(&self, x: &DenseMatrix<f64>, k: usize) -> CoreResult<Vec<usize>> {
        let params = KMeansParameters {
            k,
            max_iter: self.max_iter,
            seed: Some(self.seed),
        };

        let km: KMeans<f64, usize, DenseMatrix<f64>, Vec<usize>> = KMeans::fit(x, params)
            .map_err(|e| CoreError::Clustering(format!("k-means fit failed: {}", e)))?;

        km.predict(x)
            .map_err(|e| CoreError::Clustering(format!("k-means predict failed: {}", e)))
    }
}

impl ClusterCenters for KMeansCenters {
    fn centers(&self, matrix: &Matrix, k: usize) -> CoreResult<Vec<Vec<f64>>> {
        if matrix.is_sparse() {
            debug!("Densifying sparse input for k-means");
        }
        let x = matrix.to_dense()?;
        let labels = self.labels(&x, k)?;

        let rows = matrix.to_rows();
        let dim = matrix.ncols();
        let mut sums = vec![vec![0.0; dim]; k];
        let mut counts = vec![0usize; k];

        for (row, &label) in rows.iter().zip(&labels) {
            if label >= k {
                return Err(CoreError::Clustering(format!(
                    "k-means returned label {} for k={}",
                    label, k
                )));
            }
            counts[label] += 1;
            for (s, v) in sums[label].iter_mut().zip(row) {
                *s += v;
            }
        }

        if let Some(empty) = counts.iter().position(|&c| c == 0) {
            return Err(CoreError::Clustering(format!(
                "cluster {} of {} has no members",
                empty, k
            )));
        }
        trace!("Cluster sizes: {:?}", counts);

        Ok(sums
            .into_iter()
            .zip(counts)
            .map(|(s, c)| s.into_iter().map(|v| v / c as f64).collect())
            .collect())
    }
}

/// Compare two centres with the last coordinate as the primary key, then
/// the one before it, down to coordinate 0.
fn last_coordinate_first(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .rev()
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Stable sort of `centers` into the canonical order.
pub fn canonical_order(mut centers: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
    centers.sort_by(|a, b| last_coordinate_first(a, b));
    centers
}

/// Run `clusterer` for `k` clusters and return the centres in canonical
/// order.
///
/// # Errors
/// `InvalidClusterCount` when `k` is zero or larger than the number of rows;
/// any `Clustering` error raised by the capability is passed through.
pub fn extract_centroids(
    matrix: &Matrix,
    k: usize,
    clusterer: &impl ClusterCenters,
) -> CoreResult<Vec<Vec<f64>>> {
    let n_items = matrix.nrows();
    if k < 1 || k > n_items {
        return Err(CoreError::InvalidClusterCount {
            requested: k,
            n_items,
        });
    }

    info!("Extracting {} centroids from {} rows", k, n_items);
    let centers = clusterer.centers(matrix, k)?;
    if centers.len() != k {
        return Err(CoreError::Clustering(format!(
            "expected {} centres, clustering returned {}",
            k,
            centers.len()
        )));
    }

    Ok(canonical_order(centers))
}
