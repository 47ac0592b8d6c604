//! Query configuration.
//!
//! `QueryConfig` collects the knobs shared by every subcommand. It can be
//! loaded from a JSON file (`--config`), then individual CLI flags override
//! the file values through the `with_*` methods.

use std::fmt;
use std::path::Path;

use log::{debug, info};
use matquery_core::Metric;
use serde::{Deserialize, Serialize};

use crate::clustering::{KMeansCenters, DEFAULT_MAX_ITER, DEFAULT_SEED};
use crate::storage::{StorageError, StorageResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Distance metric for pair and nearest-row queries
    pub metric: Metric,
    /// Append the distance to each printed pair
    pub show_distance: bool,
    /// k-means seed
    pub seed: u64,
    /// k-means iteration cap
    pub max_iter: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Euclidean,
            show_distance: false,
            seed: DEFAULT_SEED,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_show_distance(mut self, show: bool) -> Self {
        self.show_distance = show;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// The k-means capability configured by this query.
    pub fn kmeans(&self) -> KMeansCenters {
        KMeansCenters::new(self.seed, self.max_iter)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> StorageResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StorageError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        let config: QueryConfig =
            serde_json::from_str(&text).map_err(|e| StorageError::Json(e.to_string()))?;
        info!("Loaded query config from {}: {}", path.as_ref().display(), config);
        Ok(config)
    }

    pub fn to_json_file(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let text =
            serde_json::to_string_pretty(self).map_err(|e| StorageError::Json(e.to_string()))?;
        std::fs::write(path.as_ref(), text).map_err(|e| StorageError::Io(e.to_string()))?;
        debug!("Saved query config to {}", path.as_ref().display());
        Ok(())
    }
}

impl fmt::Display for QueryConfig {
    /// Comma-separated `key=value` pairs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "metric={}, show_distance={}, seed={}, max_iter={}",
            self.metric, self.show_distance, self.seed, self.max_iter
        )
    }
}
