//! The item capability trait.
//!
//! The quadtree and clusterer are polymorphic over any type that can report a
//! latitude and longitude. `title` and `snippet` exist for the benefit of the
//! rendering layer (marker info windows) and default to `None`, so plain
//! coordinate types implement the trait for free.

use std::sync::Arc;

/// A single clusterable item (marker) on the map.
///
/// Latitude is expected in `[-90, 90]`, longitude in `[-180, 180]`. Items
/// falling outside that domain are silently rejected by
/// [`QuadTree::insert`](crate::QuadTree::insert).
///
/// # Example
///
/// ```rust
/// use geocluster::ClusterItem;
///
/// struct Poi {
///     lat: f64,
///     lon: f64,
///     name: String,
/// }
///
/// impl ClusterItem for Poi {
///     fn latitude(&self) -> f64 {
///         self.lat
///     }
///
///     fn longitude(&self) -> f64 {
///         self.lon
///     }
///
///     fn title(&self) -> Option<&str> {
///         Some(&self.name)
///     }
/// }
/// ```
pub trait ClusterItem {
    /// The latitude of the item, in degrees.
    fn latitude(&self) -> f64;

    /// The longitude of the item, in degrees.
    fn longitude(&self) -> f64;

    /// The title of the item, shown by the rendering layer for singletons.
    fn title(&self) -> Option<&str> {
        None
    }

    /// The snippet of the item, shown by the rendering layer for singletons.
    fn snippet(&self) -> Option<&str> {
        None
    }
}

/// `geo::Point` stores longitude in `x` and latitude in `y`.
impl ClusterItem for geo::Point<f64> {
    fn latitude(&self) -> f64 {
        self.y()
    }

    fn longitude(&self) -> f64 {
        self.x()
    }
}

/// Items shared across threads cluster like their inner type.
impl<T: ClusterItem> ClusterItem for Arc<T> {
    fn latitude(&self) -> f64 {
        self.as_ref().latitude()
    }

    fn longitude(&self) -> f64 {
        self.as_ref().longitude()
    }

    fn title(&self) -> Option<&str> {
        self.as_ref().title()
    }

    fn snippet(&self) -> Option<&str> {
        self.as_ref().snippet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_item() {
        let point = geo::Point::new(-74.0060, 40.7128);
        assert_eq!(point.latitude(), 40.7128);
        assert_eq!(point.longitude(), -74.0060);
        assert!(point.title().is_none());
        assert!(point.snippet().is_none());
    }

    #[test]
    fn test_arc_item_delegates() {
        let point = Arc::new(geo::Point::new(13.4050, 52.5200));
        assert_eq!(point.latitude(), 52.5200);
        assert_eq!(point.longitude(), 13.4050);
    }
}
