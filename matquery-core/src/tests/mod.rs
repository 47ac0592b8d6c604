
use crate::matrix::Matrix;

/// Ten 2-D points in three well separated groups: rows {0, 3, 7} top left,
/// {1, 4, 6, 9} in the middle, {2, 5, 8} bottom right.
pub(crate) fn tie_fixture_rows() -> Vec<Vec<f64>> {
    vec![
        vec![10.0, 80.0],
        vec![45.0, 35.0],
        vec![88.0, 20.0],
        vec![12.0, 83.0],
        vec![48.0, 40.0],
        vec![90.0, 17.0],
        vec![44.0, 36.0],
        vec![12.0, 80.0],
        vec![88.0, 19.0],
        vec![48.0, 39.0],
    ]
}

pub(crate) fn tie_fixture() -> Matrix {
    Matrix::from_rows(tie_fixture_rows()).unwrap()
}

/// Ten 2-D points, the same rows as `data/test.json` in the root crate.
pub(crate) fn reference_rows() -> Vec<Vec<f64>> {
    vec![
        vec![17.0, 68.0],
        vec![16.0, 85.0],
        vec![30.0, 30.0],
        vec![50.0, 50.0],
        vec![45.0, 40.0],
        vec![86.0, 26.0],
        vec![89.0, 16.0],
        vec![91.0, 14.0],
        vec![1.0, 90.0],
        vec![60.0, 30.0],
    ]
}

pub(crate) fn reference() -> Matrix {
    Matrix::from_rows(reference_rows()).unwrap()
}

/// `[[1,2,3],[2,3,4],[1,1,1]]`
pub(crate) fn sample() -> Matrix {
    Matrix::from_rows(vec![
        vec![1.0, 2.0, 3.0],
        vec![2.0, 3.0, 4.0],
        vec![1.0, 1.0, 1.0],
    ])
    .unwrap()
}

/// Same values as `tie_fixture()`, stored as CSR.
pub(crate) fn tie_fixture_sparse() -> Matrix {
    let triplets: Vec<(usize, usize, f64)> = tie_fixture_rows()
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0.0)
                .map(move |(j, v)| (i, j, *v))
                .collect::<Vec<_>>()
        })
        .collect();
    Matrix::from_triplets(&triplets).unwrap()
}
