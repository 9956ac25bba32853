//! Error types for geocluster.

use thiserror::Error;

/// Errors produced by configuration validation and the cluster engine.
///
/// The clustering algorithms themselves are total over well-formed input;
/// out-of-domain points are reported through return values, not errors.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Configuration rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Zoom level that would produce a degenerate tile grid.
    #[error("zoom level must be finite and non-negative, got {0}")]
    InvalidZoom(f64),

    /// A clustering pass was requested before any camera was set.
    #[error("no camera position set; call set_camera before request_clusters")]
    NoCamera,

    /// The background worker has shut down and can no longer accept tasks.
    #[error("cluster engine worker has stopped")]
    EngineStopped,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
