use matquery_core::{Matrix, RowPair};

use crate::render::{centroid_line, format_float, pair_line, render_matrix};
use crate::tests::sample_rows;

#[test]
fn test_format_float_twelve_significant_digits() {
    assert_eq!(format_float(250.0_f64.sqrt()), "15.8113883008");
    assert_eq!(format_float(88.0 + 2.0 / 3.0), "88.6666666667");
    assert_eq!(format_float(3.0_f64.sqrt()), "1.73205080757");
}

#[test]
fn test_format_float_integral_keeps_point_zero() {
    assert_eq!(format_float(81.0), "81.0");
    assert_eq!(format_float(2.0), "2.0");
    assert_eq!(format_float(0.0), "0.0");
    assert_eq!(format_float(-4.0), "-4.0");
}

#[test]
fn test_format_float_exponent_forms() {
    assert_eq!(format_float(1e16), "1e+16");
    assert_eq!(format_float(0.00001), "1e-05");
    assert_eq!(format_float(0.0001), "0.0001");
    assert_eq!(format_float(123456789012.0), "123456789012.0");
    assert_eq!(format_float(f64::INFINITY), "inf");
}

#[test]
fn test_pair_line() {
    let pair = RowPair::new(7, 0, 2.0);
    assert_eq!(pair_line(&pair, false), "0 7");
    assert_eq!(pair_line(&pair, true), "0 7 2.0");
}

#[test]
fn test_centroid_line() {
    assert_eq!(centroid_line(&[46.25, 37.5]), "46.25 37.5");
    assert_eq!(centroid_line(&[11.0 + 1.0 / 3.0, 81.0]), "11.3333333333 81.0");
}

#[test]
fn test_render_integral_matrix() {
    let m = Matrix::from_rows(sample_rows()).unwrap();
    assert_eq!(render_matrix(&m), "[[1 2 3]\n [2 3 4]\n [1 1 1]]");
}

#[test]
fn test_render_right_aligns_columns() {
    let m = Matrix::from_rows(vec![vec![10.0, 2.0], vec![3.0, -4.0]]).unwrap();
    assert_eq!(render_matrix(&m), "[[10  2]\n [ 3 -4]]");

    let f = Matrix::from_rows(vec![vec![0.5, 12.25]]).unwrap();
    assert_eq!(render_matrix(&f), "[[  0.5 12.25]]");
}

#[test]
fn test_render_sparse_is_densified() {
    let m = Matrix::from_triplets(&[(0, 1, 5.0), (1, 0, 1.0)]).unwrap();
    assert_eq!(render_matrix(&m), "[[0 5]\n [1 0]]");
}
