// matquery-core/src/lib.rs
//! # matquery-core
//!
//! Distance engine and deterministic ranking for row-oriented matrices.
//!
//! - [`Matrix`]: validated dense (`smartcore`) or sparse (`sprs` CSR) input
//! - [`distance`]: metric registry, pairwise distance matrix, single-row
//!   distance vector
//! - [`ranking`]: nearest row to a reference row, k closest / k furthest
//!   distinct pairs with row-major tie-breaking
//!
//! ```
//! use matquery_core::{closest_pairs, pairwise_distances, Matrix, Metric};
//!
//! let m = Matrix::from_rows(vec![
//!     vec![0.0, 0.0],
//!     vec![0.0, 1.0],
//!     vec![5.0, 5.0],
//! ])
//! .unwrap();
//! let dist = pairwise_distances(&m, Metric::Euclidean).unwrap();
//! let pairs = closest_pairs(&dist, 1).unwrap();
//! assert_eq!((pairs[0].i, pairs[0].j), (0, 1));
//! ```

pub mod distance;
pub mod error;
pub mod matrix;
pub mod ranking;

#[cfg(test)]
mod tests;

pub use distance::{
    distances_to_row, pairwise_distances, pairwise_distances_named, DistanceMatrix, Metric,
};
pub use error::{CoreError, CoreResult};
pub use matrix::{Matrix, MAX_TRIPLET_INDEX};
pub use ranking::{
    available_pairs, closest_pairs, closest_to, furthest_pairs, nearest_in_row, nearest_row,
    rank_pairs, RankOrder, RowPair,
};

#[cfg(test)]
pub(crate) fn init() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("debug");
        let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
    });
}
