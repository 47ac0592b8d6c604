// matquery-core/src/error.rs
use std::fmt;

/// Result alias for the query engine.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised by matrix validation, distance computation and ranking.
///
/// Every variant is raised where the problem is detected and travels to the
/// caller unchanged; nothing in the engine retries.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Metric name not present in the registry.
    UnknownMetric(String),

    /// Row index outside `[0, len)`.
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of rows.
        len: usize,
    },

    /// Cluster count outside `[1, n_items]`.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of rows available.
        n_items: usize,
    },

    /// Zero rows, zero columns, ragged rows or non-finite values.
    MalformedMatrix(String),

    /// The query needs more rows than the matrix has.
    NotEnoughRows {
        /// Rows in the matrix.
        n_rows: usize,
        /// Rows the query needs.
        needed: usize,
    },

    /// Pair count outside `[1, n(n-1)/2]`.
    InvalidPairCount {
        /// Requested number of pairs.
        requested: usize,
        /// Distinct unordered pairs available.
        available: usize,
    },

    /// The clustering capability failed (fit error, empty cluster).
    Clustering(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::UnknownMetric(name) => write!(f, "unknown metric '{}'", name),
            CoreError::IndexOutOfRange { index, len } => {
                write!(f, "row index {} out of range for {} rows", index, len)
            }
            CoreError::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot create {} clusters from {} rows", requested, n_items)
            }
            CoreError::MalformedMatrix(msg) => write!(f, "malformed matrix: {}", msg),
            CoreError::NotEnoughRows { n_rows, needed } => write!(
                f,
                "query needs at least {} rows, matrix has {}",
                needed, n_rows
            ),
            CoreError::InvalidPairCount {
                requested,
                available,
            } => write!(
                f,
                "requested {} pairs but only {} distinct pairs exist",
                requested, available
            ),
            CoreError::Clustering(msg) => write!(f, "clustering failed: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = CoreError::IndexOutOfRange { index: 9, len: 3 };
        assert_eq!(e.to_string(), "row index 9 out of range for 3 rows");

        let e = CoreError::InvalidPairCount {
            requested: 4,
            available: 3,
        };
        assert_eq!(
            e.to_string(),
            "requested 4 pairs but only 3 distinct pairs exist"
        );

        let e = CoreError::UnknownMetric("bogus".to_string());
        assert_eq!(e.to_string(), "unknown metric 'bogus'");
    }
}
