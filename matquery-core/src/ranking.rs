// matquery-core/src/ranking.rs
//! Pair ranking and single-row nearest neighbour over a distance matrix.
//!
//! Exclusion is done with sentinels, never by removing entries: the self
//! distance is overwritten with `+∞` before an argmin, and the lower triangle
//! (diagonal included) is overwritten before a global sort. Indices therefore
//! keep mapping straight back to matrix rows.
//!
//! Ordering is fully deterministic:
//! - argmin keeps the first (lowest-index) minimiser
//! - the pair sort is stable over row-major flat indices, so equal distances
//!   keep `(i, j)` order; furthest mode reads that order back to front

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::distance::{distances_to_row, DistanceMatrix, Metric};
use crate::error::{CoreError, CoreResult};
use crate::matrix::Matrix;

/// Unordered row pair in canonical form (`i < j`) with its distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowPair {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
}

impl RowPair {
    /// Canonicalise `(a, b)` so the smaller index comes first.
    pub fn new(a: usize, b: usize, distance: f64) -> Self {
        let (i, j) = if a <= b { (a, b) } else { (b, a) };
        Self { i, j, distance }
    }
}

/// Which end of the distance order to take pairs from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankOrder {
    /// Smallest distances first
    Nearest,
    /// Largest distances first
    Furthest,
}

impl RankOrder {
    /// Value written over the lower triangle so masked entries are never
    /// selected. Furthest mode uses `-∞` rather than `0.0` so duplicate rows
    /// (real zero distances) cannot tie with masked cells.
    fn sentinel(&self) -> f64 {
        match self {
            RankOrder::Nearest => f64::INFINITY,
            RankOrder::Furthest => f64::NEG_INFINITY,
        }
    }
}

/// Number of distinct unordered pairs among `n` rows.
pub fn available_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Index of the smallest entry of `distances` other than `reference`.
///
/// `distances[reference]` is overwritten with `+∞`. Ties resolve to the lowest
/// index.
pub fn nearest_in_row(distances: &mut [f64], reference: usize) -> CoreResult<(usize, f64)> {
    let n = distances.len();
    if reference >= n {
        return Err(CoreError::IndexOutOfRange {
            index: reference,
            len: n,
        });
    }
    if n < 2 {
        return Err(CoreError::NotEnoughRows {
            n_rows: n,
            needed: 2,
        });
    }

    distances[reference] = f64::INFINITY;

    let mut best = 0;
    for (idx, &d) in distances.iter().enumerate().skip(1) {
        if d < distances[best] {
            best = idx;
        }
    }
    trace!(
        "Nearest to row {} is row {} at {}",
        reference,
        best,
        distances[best]
    );
    Ok((best, distances[best]))
}

/// Nearest other row to `reference`, read from a full distance matrix.
pub fn closest_to(dist: &DistanceMatrix, reference: usize) -> CoreResult<RowPair> {
    if reference >= dist.n() {
        return Err(CoreError::IndexOutOfRange {
            index: reference,
            len: dist.n(),
        });
    }
    let mut row = dist.row(reference).to_vec();
    let (j, d) = nearest_in_row(&mut row, reference)?;
    Ok(RowPair::new(reference, j, d))
}

/// Nearest other row to `reference`, computing only the N distances it needs.
pub fn nearest_row(matrix: &Matrix, reference: usize, metric: Metric) -> CoreResult<RowPair> {
    let mut row = distances_to_row(matrix, reference, metric)?;
    let (j, d) = nearest_in_row(&mut row, reference)?;
    debug!("closest_to({}) -> ({}, {})", reference, j, d);
    Ok(RowPair::new(reference, j, d))
}

/// The `k` distinct pairs at one end of the distance order.
///
/// `k` must lie in `[1, n(n-1)/2]`; asking for more pairs than exist is an
/// error rather than a short or padded answer.
pub fn rank_pairs(dist: &DistanceMatrix, k: usize, order: RankOrder) -> CoreResult<Vec<RowPair>> {
    let n = dist.n();
    if n < 2 {
        return Err(CoreError::NotEnoughRows {
            n_rows: n,
            needed: 2,
        });
    }
    let available = available_pairs(n);
    if k == 0 || k > available {
        return Err(CoreError::InvalidPairCount {
            requested: k,
            available,
        });
    }

    let sentinel = order.sentinel();
    let mut masked = dist.as_slice().to_vec();
    for i in 0..n {
        for j in 0..=i {
            masked[i * n + j] = sentinel;
        }
    }

    // sort_by is stable: equal values keep ascending flat-index order
    let mut flat: Vec<usize> = (0..n * n).collect();
    flat.sort_by(|&a, &b| masked[a].total_cmp(&masked[b]));

    let selected: Vec<usize> = match order {
        RankOrder::Nearest => flat[..k].to_vec(),
        RankOrder::Furthest => flat[flat.len() - k..].iter().rev().copied().collect(),
    };

    let pairs: Vec<RowPair> = selected
        .into_iter()
        .map(|idx| {
            let (row, col) = (idx / n, idx % n);
            RowPair::new(row, col, dist.get(row, col))
        })
        .collect();

    debug!(
        "Ranked {} {:?} pairs out of {} available",
        pairs.len(),
        order,
        available
    );
    Ok(pairs)
}

/// The `k` closest distinct pairs, smallest distance first.
pub fn closest_pairs(dist: &DistanceMatrix, k: usize) -> CoreResult<Vec<RowPair>> {
    rank_pairs(dist, k, RankOrder::Nearest)
}

/// The `k` furthest distinct pairs, largest distance first.
pub fn furthest_pairs(dist: &DistanceMatrix, k: usize) -> CoreResult<Vec<RowPair>> {
    rank_pairs(dist, k, RankOrder::Furthest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_pair_is_canonical() {
        let p = RowPair::new(7, 2, 1.5);
        assert_eq!((p.i, p.j), (2, 7));
    }

    #[test]
    fn test_available_pairs() {
        assert_eq!(available_pairs(0), 0);
        assert_eq!(available_pairs(1), 0);
        assert_eq!(available_pairs(2), 1);
        assert_eq!(available_pairs(10), 45);
    }

    #[test]
    fn test_nearest_in_row_first_minimiser_wins() {
        let mut row = vec![0.0, 3.0, 1.0, 1.0, 2.0];
        let (idx, d) = nearest_in_row(&mut row, 0).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(d, 1.0);
        assert!(row[0].is_infinite());
    }
}
