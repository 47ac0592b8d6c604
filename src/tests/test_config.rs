use matquery_core::Metric;
use tempfile::TempDir;

use crate::clustering::KMeansCenters;
use crate::config::QueryConfig;
use crate::storage::StorageError;

#[test]
fn test_defaults() {
    let config = QueryConfig::default();
    assert_eq!(config.metric, Metric::Euclidean);
    assert!(!config.show_distance);
    assert_eq!(config.kmeans(), KMeansCenters::default());
    assert_eq!(config.kmeans().seed, 128);
}

#[test]
fn test_builder_methods() {
    let config = QueryConfig::new()
        .with_metric(Metric::Manhattan)
        .with_show_distance(true)
        .with_seed(7)
        .with_max_iter(20);

    assert_eq!(config.metric, Metric::Manhattan);
    assert!(config.show_distance);
    assert_eq!(config.kmeans(), KMeansCenters::new(7, 20));
    assert_eq!(
        config.to_string(),
        "metric=manhattan, show_distance=true, seed=7, max_iter=20"
    );
}

#[test]
fn test_json_file_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("query.json");

    let config = QueryConfig::new()
        .with_metric(Metric::SquaredEuclidean)
        .with_seed(99);
    config.to_json_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"sqeuclidean\""));
    assert_eq!(QueryConfig::from_json_file(&path).unwrap(), config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("partial.json");
    std::fs::write(&path, r#"{"metric": "cosine"}"#).unwrap();

    let config = QueryConfig::from_json_file(&path).unwrap();
    assert_eq!(config, QueryConfig::new().with_metric(Metric::Cosine));
}

#[test]
fn test_bad_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.json");
    std::fs::write(&path, r#"{"metric": "hamming"}"#).unwrap();

    assert!(matches!(
        QueryConfig::from_json_file(&path).unwrap_err(),
        StorageError::Json(_)
    ));
    assert!(matches!(
        QueryConfig::from_json_file(temp_dir.path().join("missing.json")).unwrap_err(),
        StorageError::Io(_)
    ));
}
