//! The cluster result record.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::geometry::LatLngBounds;

/// A cluster of one or more items produced by a clustering pass.
///
/// Identity is defined by the centroid alone: two clusters with the same
/// latitude and longitude compare equal even if their membership differs.
/// The rendering layer relies on this when diffing consecutive passes to
/// decide which markers to keep, add, or animate away.
///
/// Clusters are created fresh on every pass; the previous pass's clusters
/// are discarded by the caller after diffing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster<T> {
    latitude: f64,
    longitude: f64,
    items: Vec<T>,
    bounds: LatLngBounds,
}

impl<T> Cluster<T> {
    pub(crate) fn new(latitude: f64, longitude: f64, items: Vec<T>, bounds: LatLngBounds) -> Self {
        debug_assert!(!items.is_empty(), "a cluster holds at least one item");
        Self {
            latitude,
            longitude,
            items,
            bounds,
        }
    }

    /// The latitude of the cluster centroid.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// The longitude of the cluster centroid.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The items contained in the cluster, at least one.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the cluster, yielding its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The bounds of the tile this cluster originated from.
    pub fn bounds(&self) -> LatLngBounds {
        self.bounds
    }

    /// Whether the coordinate lies within the originating tile's bounds.
    ///
    /// Used by the rendering layer to find the cluster a marker moved into
    /// when animating between passes.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.bounds.contains(latitude, longitude)
    }
}

/// Centroid-only equality, compared by bit pattern so that equality and
/// hashing stay consistent (`-0.0` and `0.0` are distinct centroids).
impl<T> PartialEq for Cluster<T> {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl<T> Eq for Cluster<T> {}

impl<T> Hash for Cluster<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}
