// matquery-core/src/matrix.rs
//! Input matrix model: rows are observations, columns are features.
//!
//! A `Matrix` is either dense (`smartcore` `DenseMatrix`) or sparse (`sprs`
//! CSR). Both variants are validated on construction: at least one row, at
//! least one column, and only finite values. Rows of a dense matrix built from
//! nested vectors must all have the same length.

use log::{debug, trace};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use sprs::{CsMat, TriMat};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone)]
pub enum Matrix {
    Dense(DenseMatrix<f64>),
    Sparse(CsMat<f64>),
}

/// Upper bound (exclusive) on row and column indices accepted by
/// [`Matrix::from_triplets`]. The inferred shape sizes the CSR index arrays.
pub const MAX_TRIPLET_INDEX: usize = 1 << 24;

impl Matrix {
    /// Build a dense matrix from row vectors, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> CoreResult<Self> {
        let nrows = rows.len();
        if nrows == 0 {
            return Err(CoreError::MalformedMatrix("matrix has no rows".to_string()));
        }
        let ncols = rows[0].len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(CoreError::MalformedMatrix(format!(
                "row {} has {} columns, expected {}",
                idx,
                row.len(),
                ncols
            )));
        }
        if ncols == 0 {
            return Err(CoreError::MalformedMatrix(
                "matrix has no columns".to_string(),
            ));
        }

        let dense = DenseMatrix::from_2d_vec(&rows)
            .map_err(|e| CoreError::MalformedMatrix(e.to_string()))?;
        Self::dense(dense)
    }

    /// Wrap an existing dense matrix after validation.
    pub fn dense(matrix: DenseMatrix<f64>) -> CoreResult<Self> {
        let m = Matrix::Dense(matrix);
        m.validate()?;
        Ok(m)
    }

    /// Wrap an existing sparse matrix after validation. CSC input is
    /// converted to CSR so row access stays cheap.
    pub fn sparse(matrix: CsMat<f64>) -> CoreResult<Self> {
        let csr = if matrix.is_csr() {
            matrix
        } else {
            trace!("Converting CSC input to CSR");
            matrix.to_csr()
        };
        let m = Matrix::Sparse(csr);
        m.validate()?;
        Ok(m)
    }

    /// Build a CSR matrix from `(row, col, value)` triples.
    ///
    /// The shape is `(max row + 1, max col + 1)`. Duplicate coordinates are
    /// summed. Indices at or above [`MAX_TRIPLET_INDEX`] are rejected.
    pub fn from_triplets(triplets: &[(usize, usize, f64)]) -> CoreResult<Self> {
        if triplets.is_empty() {
            return Err(CoreError::MalformedMatrix(
                "no coordinate triples provided".to_string(),
            ));
        }
        if let Some(&(r, c, _)) = triplets
            .iter()
            .find(|t| t.0 >= MAX_TRIPLET_INDEX || t.1 >= MAX_TRIPLET_INDEX)
        {
            return Err(CoreError::MalformedMatrix(format!(
                "coordinate ({}, {}) exceeds the index limit {}",
                r, c, MAX_TRIPLET_INDEX
            )));
        }
        let nrows = triplets.iter().map(|t| t.0).max().unwrap_or(0) + 1;
        let ncols = triplets.iter().map(|t| t.1).max().unwrap_or(0) + 1;

        let mut trimat = TriMat::new((nrows, ncols));
        for &(r, c, v) in triplets {
            trimat.add_triplet(r, c, v);
        }
        debug!(
            "Built {}x{} sparse matrix from {} triples",
            nrows,
            ncols,
            triplets.len()
        );
        Self::sparse(trimat.to_csr())
    }

    /// Check the invariants shared by both representations.
    pub fn validate(&self) -> CoreResult<()> {
        let (nrows, ncols) = self.shape();
        if nrows == 0 {
            return Err(CoreError::MalformedMatrix("matrix has no rows".to_string()));
        }
        if ncols == 0 {
            return Err(CoreError::MalformedMatrix(
                "matrix has no columns".to_string(),
            ));
        }

        let bad = match self {
            Matrix::Dense(m) => (0..nrows)
                .flat_map(|i| (0..ncols).map(move |j| (i, j)))
                .find(|&(i, j)| !m.get((i, j)).is_finite()),
            Matrix::Sparse(m) => m
                .iter()
                .find(|(v, _)| !v.is_finite())
                .map(|(_, (i, j))| (i, j)),
        };
        if let Some((i, j)) = bad {
            return Err(CoreError::MalformedMatrix(format!(
                "non-finite value at ({}, {})",
                i, j
            )));
        }
        Ok(())
    }

    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => m.shape(),
            Matrix::Sparse(m) => (m.rows(), m.cols()),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_))
    }

    /// Stored entries: every cell for dense input, non-zeros for sparse.
    pub fn nnz(&self) -> usize {
        match self {
            Matrix::Dense(m) => {
                let (r, c) = m.shape();
                r * c
            }
            Matrix::Sparse(m) => m.nnz(),
        }
    }

    /// Value at `(i, j)`; implicit zeros of a sparse matrix read as `0.0`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        match self {
            Matrix::Dense(m) => *m.get((i, j)),
            Matrix::Sparse(m) => m.get(i, j).copied().unwrap_or(0.0),
        }
    }

    /// Densify one row.
    pub fn row_vec(&self, i: usize) -> Vec<f64> {
        let ncols = self.ncols();
        match self {
            Matrix::Dense(m) => (0..ncols).map(|j| *m.get((i, j))).collect(),
            Matrix::Sparse(m) => {
                let mut out = vec![0.0; ncols];
                if let Some(row) = m.outer_view(i) {
                    for (j, &v) in row.iter() {
                        out[j] = v;
                    }
                }
                out
            }
        }
    }

    /// Densify the whole matrix into row vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.nrows()).map(|i| self.row_vec(i)).collect()
    }

    /// Dense copy, used where a consumer cannot work on CSR data.
    pub fn to_dense(&self) -> CoreResult<DenseMatrix<f64>> {
        match self {
            Matrix::Dense(m) => Ok(m.clone()),
            Matrix::Sparse(_) => DenseMatrix::from_2d_vec(&self.to_rows())
                .map_err(|e| CoreError::MalformedMatrix(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_row_vec_fills_zeros() {
        let m = Matrix::from_triplets(&[(0, 2, 1.5), (1, 0, -2.0)]).unwrap();
        assert_eq!(m.row_vec(0), vec![0.0, 0.0, 1.5]);
        assert_eq!(m.row_vec(1), vec![-2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dense_get_matches_rows() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.get(1, 0), 3.0);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }
}
