//! Viewport-driven marker clustering for maps, backed by a region quadtree.
//!
//! Many markers plus a viewport and zoom level in, a small list of clusters
//! out. Points are indexed in a [`QuadTree`]; a clustering pass partitions
//! the world into a tile grid sized for the zoom level and aggregates the
//! points per tile into centroid clusters or singletons.
//!
//! ```rust
//! use geocluster::{LatLngBounds, QuadTree, clusters_for_viewport};
//! use geo::Point;
//!
//! let mut tree = QuadTree::default();
//! tree.insert(Point::new(-74.0060, 40.7128));
//! tree.insert(Point::new(-73.9442, 40.6782));
//!
//! let viewport = LatLngBounds::new(41.0, -75.0, 40.0, -73.0);
//! let clusters = clusters_for_viewport(&tree, &viewport, 5.0, 1)?;
//! assert_eq!(clusters.iter().map(|c| c.items().len()).sum::<usize>(), 2);
//! # Ok::<(), geocluster::ClusterError>(())
//! ```
//!
//! For the asynchronous, camera-driven flow (rebuild off the caller's
//! thread, re-cluster when the camera idles) see [`ClusterEngine`].

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod item;
pub mod quadtree;
pub mod tiles;

pub use cluster::Cluster;
pub use config::Config;
pub use engine::{Camera, ClusterEngine, ClusterEngineBuilder};
pub use error::{ClusterError, Result};
pub use geometry::LatLngBounds;
pub use item::ClusterItem;
pub use quadtree::{DEFAULT_BUCKET_CAPACITY, QuadTree};
pub use tiles::{TileGrid, clusters_for_viewport};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Cluster, ClusterError, ClusterItem, Config, LatLngBounds, QuadTree, Result};

    pub use crate::{Camera, ClusterEngine, ClusterEngineBuilder};

    pub use crate::{TileGrid, clusters_for_viewport};

    pub use geo::Point;
}
