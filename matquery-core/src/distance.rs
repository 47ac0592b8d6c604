// matquery-core/src/distance.rs
//! Distance metrics and the pairwise distance engine
//!
//! Implements:
//! - A closed registry of row metrics (`Metric`), selectable by name
//! - Full N x N pairwise distance matrices
//! - Distance vectors against a single reference row
//!
//! Every metric here treats a coordinate where both rows are zero as
//! contributing nothing. Sparse rows are therefore compared with a merge over
//! their stored indices and never densified.
//!
//! # Performance
//! - Memory: O(N²) for the full matrix, which is the scaling limit of the tool
//! - Time: O(N² · D) dense, O(N² · nnz_row) sparse

use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::matrix::Matrix;

/// Named pairwise distance between two equal-length rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// L2 distance
    #[default]
    Euclidean,
    /// L2 distance without the square root
    #[serde(rename = "sqeuclidean")]
    SquaredEuclidean,
    /// L1 / city block distance
    Manhattan,
    /// L∞ distance
    Chebyshev,
    /// 1 - cos(θ); a zero row has similarity 0 with everything
    Cosine,
    Canberra,
    BrayCurtis,
}

impl Metric {
    /// Every metric in the registry, in canonical-name order.
    pub const ALL: [Metric; 7] = [
        Metric::BrayCurtis,
        Metric::Canberra,
        Metric::Chebyshev,
        Metric::Cosine,
        Metric::Euclidean,
        Metric::Manhattan,
        Metric::SquaredEuclidean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::SquaredEuclidean => "sqeuclidean",
            Metric::Manhattan => "manhattan",
            Metric::Chebyshev => "chebyshev",
            Metric::Cosine => "cosine",
            Metric::Canberra => "canberra",
            Metric::BrayCurtis => "braycurtis",
        }
    }

    /// Distance between two dense rows.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let mut acc = Accumulator::new(*self);
        for (&x, &y) in a.iter().zip(b.iter()) {
            acc.push(x, y);
        }
        acc.finish()
    }

    /// Distance between two sparse rows given as sorted `(indices, values)`.
    ///
    /// Only coordinates stored in at least one row are visited.
    pub fn sparse_distance(&self, a: (&[usize], &[f64]), b: (&[usize], &[f64])) -> f64 {
        let (ia, va) = a;
        let (ib, vb) = b;
        let mut acc = Accumulator::new(*self);
        let (mut p, mut q) = (0, 0);
        while p < ia.len() || q < ib.len() {
            if q >= ib.len() || (p < ia.len() && ia[p] < ib[q]) {
                acc.push(va[p], 0.0);
                p += 1;
            } else if p >= ia.len() || ib[q] < ia[p] {
                acc.push(0.0, vb[q]);
                q += 1;
            } else {
                acc.push(va[p], vb[q]);
                p += 1;
                q += 1;
            }
        }
        acc.finish()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            "sqeuclidean" => Ok(Metric::SquaredEuclidean),
            "manhattan" | "cityblock" | "l1" => Ok(Metric::Manhattan),
            "chebyshev" => Ok(Metric::Chebyshev),
            "cosine" => Ok(Metric::Cosine),
            "canberra" => Ok(Metric::Canberra),
            "braycurtis" => Ok(Metric::BrayCurtis),
            _ => Err(CoreError::UnknownMetric(s.to_string())),
        }
    }
}

/// Running state for one row-pair distance.
struct Accumulator {
    metric: Metric,
    sum: f64,
    max: f64,
    dot: f64,
    norm_a: f64,
    norm_b: f64,
    denom: f64,
}

impl Accumulator {
    fn new(metric: Metric) -> Self {
        Self {
            metric,
            sum: 0.0,
            max: 0.0,
            dot: 0.0,
            norm_a: 0.0,
            norm_b: 0.0,
            denom: 0.0,
        }
    }

    #[inline]
    fn push(&mut self, a: f64, b: f64) {
        match self.metric {
            Metric::Euclidean | Metric::SquaredEuclidean => {
                let d = a - b;
                self.sum += d * d;
            }
            Metric::Manhattan => self.sum += (a - b).abs(),
            Metric::Chebyshev => self.max = self.max.max((a - b).abs()),
            Metric::Cosine => {
                self.dot += a * b;
                self.norm_a += a * a;
                self.norm_b += b * b;
            }
            Metric::Canberra => {
                let d = a.abs() + b.abs();
                if d > 0.0 {
                    self.sum += (a - b).abs() / d;
                }
            }
            Metric::BrayCurtis => {
                self.sum += (a - b).abs();
                self.denom += (a + b).abs();
            }
        }
    }

    fn finish(self) -> f64 {
        match self.metric {
            Metric::Euclidean => self.sum.sqrt(),
            Metric::SquaredEuclidean | Metric::Manhattan | Metric::Canberra => self.sum,
            Metric::Chebyshev => self.max,
            Metric::Cosine => {
                let norms = self.norm_a.sqrt() * self.norm_b.sqrt();
                let sim = if norms > 0.0 { self.dot / norms } else { 0.0 };
                (1.0 - sim).clamp(0.0, 2.0)
            }
            Metric::BrayCurtis => {
                if self.denom > 0.0 {
                    self.sum / self.denom
                } else {
                    0.0
                }
            }
        }
    }
}

/// Dense N x N distance matrix, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Wrap a row-major N x N buffer.
    pub fn from_vec(n: usize, data: Vec<f64>) -> CoreResult<Self> {
        if data.len() != n * n {
            return Err(CoreError::MalformedMatrix(format!(
                "distance buffer has {} entries, expected {}",
                data.len(),
                n * n
            )));
        }
        Ok(Self { n, data })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Row-major backing storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Row accessor shared by the dense and sparse paths. Sparse rows keep only
/// their stored `(indices, values)`.
enum Rows {
    Dense(Vec<Vec<f64>>),
    Sparse(Vec<(Vec<usize>, Vec<f64>)>),
}

impl Rows {
    fn new(matrix: &Matrix) -> Self {
        match matrix {
            Matrix::Dense(_) => Rows::Dense(matrix.to_rows()),
            Matrix::Sparse(m) => Rows::Sparse(
                m.outer_iterator()
                    .map(|row| (row.indices().to_vec(), row.data().to_vec()))
                    .collect(),
            ),
        }
    }

    fn distance(&self, metric: Metric, i: usize, j: usize) -> f64 {
        match self {
            Rows::Dense(rows) => metric.distance(&rows[i], &rows[j]),
            Rows::Sparse(rows) => {
                let (ia, va) = &rows[i];
                let (ib, vb) = &rows[j];
                metric.sparse_distance(
                    (ia.as_slice(), va.as_slice()),
                    (ib.as_slice(), vb.as_slice()),
                )
            }
        }
    }
}

/// Full pairwise distance matrix between the rows of `matrix`.
///
/// Each unordered pair is computed once and mirrored, so the result is
/// exactly symmetric with a zero diagonal.
pub fn pairwise_distances(matrix: &Matrix, metric: Metric) -> CoreResult<DistanceMatrix> {
    matrix.validate()?;
    let n = matrix.nrows();
    debug!(
        "Computing {}x{} pairwise distances ({}, sparse={})",
        n,
        n,
        metric,
        matrix.is_sparse()
    );

    let rows = Rows::new(matrix);
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = rows.distance(metric, i, j);
            data[i * n + j] = d;
            data[j * n + i] = d;
        }
    }
    trace!("Pairwise distances: {:?}", data);

    DistanceMatrix::from_vec(n, data)
}

/// Distances from every row of `matrix` to row `reference`.
///
/// The entry at `reference` is exactly zero.
pub fn distances_to_row(matrix: &Matrix, reference: usize, metric: Metric) -> CoreResult<Vec<f64>> {
    matrix.validate()?;
    let n = matrix.nrows();
    if reference >= n {
        return Err(CoreError::IndexOutOfRange {
            index: reference,
            len: n,
        });
    }
    debug!(
        "Computing distances from {} rows to row {} ({})",
        n, reference, metric
    );

    let rows = Rows::new(matrix);
    Ok((0..n)
        .map(|i| {
            if i == reference {
                0.0
            } else {
                rows.distance(metric, i, reference)
            }
        })
        .collect())
}

/// Convenience wrapper resolving the metric by name first.
pub fn pairwise_distances_named(matrix: &Matrix, metric: &str) -> CoreResult<DistanceMatrix> {
    let metric: Metric = metric.parse()?;
    pairwise_distances(matrix, metric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_three_four_five() {
        let d = Metric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-12, "3-4-5 triangle: got {}", d);
    }

    #[test]
    fn test_sparse_merge_matches_dense() {
        let a_dense = [0.0, 2.0, 0.0, 1.0];
        let b_dense = [3.0, 0.0, 0.0, 4.0];
        let a = (&[1usize, 3][..], &[2.0, 1.0][..]);
        let b = (&[0usize, 3][..], &[3.0, 4.0][..]);
        for metric in Metric::ALL {
            let dense = metric.distance(&a_dense, &b_dense);
            let sparse = metric.sparse_distance(a, b);
            assert!(
                (dense - sparse).abs() < 1e-12,
                "{}: dense={} sparse={}",
                metric,
                dense,
                sparse
            );
        }
    }

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
    }
}
