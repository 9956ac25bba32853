//! Clustering configuration.
//!
//! This module provides a small, serializable configuration type covering the
//! two knobs the clustering core exposes: quadtree fan-out and the singleton
//! threshold.

use serde::de::Error;
use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Clustering configuration.
///
/// Designed to be easily serializable and loadable from JSON or TOML while
/// keeping complexity minimal. Both values are fixed for the lifetime of an
/// engine or quadtree once passed in.
///
/// # Example
///
/// ```rust
/// use geocluster::Config;
///
/// let config = Config::default();
/// assert_eq!(config.bucket_capacity, 4);
///
/// let config: Config = serde_json::from_str(
///     r#"{ "bucket_capacity": 8, "min_cluster_size": 3 }"#,
/// ).unwrap();
/// assert_eq!(config.min_cluster_size, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of points a quadtree node holds before subdividing.
    #[serde(default = "Config::default_bucket_capacity")]
    pub bucket_capacity: usize,

    /// Tiles holding fewer points than this emit one singleton cluster per
    /// point instead of a merged cluster.
    #[serde(default = "Config::default_min_cluster_size")]
    pub min_cluster_size: usize,
}

impl Config {
    const fn default_bucket_capacity() -> usize {
        4
    }

    const fn default_min_cluster_size() -> usize {
        1
    }

    pub fn with_bucket_capacity(mut self, capacity: usize) -> Self {
        self.bucket_capacity = capacity;
        self
    }

    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Validate configuration values.
    ///
    /// Both values must be positive: a zero bucket capacity would subdivide
    /// forever on the first insert, and a zero minimum cluster size would
    /// never emit merged clusters.
    pub fn validate(&self) -> Result<()> {
        if self.bucket_capacity == 0 {
            return Err(ClusterError::InvalidConfig(
                "bucket capacity must be greater than zero".to_string(),
            ));
        }
        if self.min_cluster_size == 0 {
            return Err(ClusterError::InvalidConfig(
                "minimum cluster size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a TOML string (requires the `toml` feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_capacity: Self::default_bucket_capacity(),
            min_cluster_size: Self::default_min_cluster_size(),
        }
    }
}
