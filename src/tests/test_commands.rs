use matquery_core::{CoreError, Metric};
use tempfile::TempDir;

use crate::commands::{run, Query};
use crate::config::QueryConfig;
use crate::error::Error;
use crate::storage::{InputSource, StorageError};
use crate::tests::{data_path, init};

fn fixture_source() -> InputSource {
    InputSource::Json(data_path("test.json").display().to_string())
}

fn output(query: &Query, source: &InputSource, config: &QueryConfig) -> String {
    let mut buf: Vec<u8> = Vec::new();
    run(query, source, config, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_print_mat() {
    init();
    let source = InputSource::Csv(data_path("sample.csv"));
    assert_eq!(
        output(&Query::PrintMat, &source, &QueryConfig::default()),
        "[[1 2 3]\n [2 3 4]\n [1 1 1]]\n"
    );
}

#[test]
fn test_echo_does_not_load() {
    let source = InputSource::Csv("/nonexistent/data.csv".into());
    assert_eq!(
        output(&Query::Echo { times: 2 }, &source, &QueryConfig::default()),
        "The given input was of type: csv_file\nAnd the value was: /nonexistent/data.csv\n\
         The given input was of type: csv_file\nAnd the value was: /nonexistent/data.csv\n"
    );
}

#[test]
fn test_closest_to() {
    let config = QueryConfig::default();
    assert_eq!(
        output(&Query::ClosestTo { row: 8 }, &fixture_source(), &config),
        "1 8\n"
    );
    assert_eq!(
        output(
            &Query::ClosestTo { row: 8 },
            &fixture_source(),
            &config.with_show_distance(true)
        ),
        "1 8 15.8113883008\n"
    );
}

#[test]
fn test_closest_pairs() {
    let config = QueryConfig::default();
    assert_eq!(
        output(&Query::Closest { n: 2 }, &fixture_source(), &config),
        "6 7\n5 6\n"
    );
    assert_eq!(
        output(
            &Query::Closest { n: 2 },
            &fixture_source(),
            &config.with_show_distance(true)
        ),
        "6 7 2.82842712475\n5 6 10.4403065089\n"
    );
}

#[test]
fn test_furthest_pairs() {
    let config = QueryConfig::default();
    assert_eq!(
        output(&Query::Furthest { n: 3 }, &fixture_source(), &config),
        "7 8\n6 8\n5 8\n"
    );
    assert_eq!(
        output(
            &Query::Furthest { n: 3 },
            &fixture_source(),
            &config.with_show_distance(true)
        ),
        "7 8 117.796434581\n6 8 114.978258814\n5 8 106.40018797\n"
    );
}

#[test]
fn test_tied_pairs_follow_row_major_order() {
    // (0, 1) and (2, 3) are both at distance 1
    let source = InputSource::Json("[[0, 0], [0, 1], [5, 5], [5, 6]]".to_string());
    let config = QueryConfig::default().with_show_distance(true);
    assert_eq!(
        output(&Query::Closest { n: 2 }, &source, &config),
        "0 1 1.0\n2 3 1.0\n"
    );
}

#[test]
fn test_metric_changes_distance() {
    let config = QueryConfig::default()
        .with_metric(Metric::Manhattan)
        .with_show_distance(true);
    // |16-1| + |85-90|
    assert_eq!(
        output(&Query::ClosestTo { row: 8 }, &fixture_source(), &config),
        "1 8 20.0\n"
    );
}

#[test]
fn test_centroids() {
    assert_eq!(
        output(
            &Query::Centroids { n: 3 },
            &fixture_source(),
            &QueryConfig::default()
        ),
        "88.6666666667 18.6666666667\n46.25 37.5\n11.3333333333 81.0\n"
    );
}

#[test]
fn test_convert_then_query_parquet() {
    let temp_dir = TempDir::new().unwrap();
    let converted = output(
        &Query::Convert {
            out_dir: temp_dir.path().to_path_buf(),
            name: "fixture".to_string(),
        },
        &fixture_source(),
        &QueryConfig::default(),
    );
    let path = temp_dir.path().join("fixture.parquet");
    assert_eq!(converted.trim_end(), path.display().to_string());

    let parquet = InputSource::Parquet(path);
    assert_eq!(
        output(&Query::Closest { n: 2 }, &parquet, &QueryConfig::default()),
        "6 7\n5 6\n"
    );
}

#[test]
fn test_errors_surface() {
    let mut buf: Vec<u8> = Vec::new();
    let config = QueryConfig::default();

    let err = run(&Query::ClosestTo { row: 10 }, &fixture_source(), &config, &mut buf)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Core(CoreError::IndexOutOfRange { index: 10, len: 10 })
    ));

    let err = run(&Query::Closest { n: 46 }, &fixture_source(), &config, &mut buf).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(CoreError::InvalidPairCount {
            requested: 46,
            available: 45
        })
    ));

    let err = run(&Query::Centroids { n: 0 }, &fixture_source(), &config, &mut buf).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(CoreError::InvalidClusterCount { .. })
    ));

    let missing = InputSource::Csv("/nonexistent/data.csv".into());
    let err = run(&Query::PrintMat, &missing, &config, &mut buf).unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::Io(_))));
    assert!(buf.is_empty());
}
