//! Axis-aligned bounding boxes in latitude/longitude space.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in latitude/longitude space.
///
/// Invariant: `north >= south`. Within a single bounds value `west <= east`
/// is assumed; a viewport crossing the ±180° antimeridian (where west
/// numerically exceeds east) must be pre-split into two non-wrapping bounds
/// before reaching the quadtree, exactly as the tile clusterer does.
///
/// # Example
///
/// ```rust
/// use geocluster::LatLngBounds;
///
/// let bounds = LatLngBounds::new(40.8, -74.1, 40.6, -73.9);
/// assert!(bounds.contains(40.7128, -74.0060));
/// assert!(!bounds.contains(34.0522, -118.2437));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    /// Northern boundary latitude.
    pub north: f64,
    /// Western boundary longitude.
    pub west: f64,
    /// Southern boundary latitude.
    pub south: f64,
    /// Eastern boundary longitude.
    pub east: f64,
}

impl LatLngBounds {
    /// Create bounds from the four boundary coordinates.
    pub const fn new(north: f64, west: f64, south: f64, east: f64) -> Self {
        Self {
            north,
            west,
            south,
            east,
        }
    }

    /// The full latitude/longitude domain the quadtree is rooted at.
    pub const fn world() -> Self {
        Self::new(90.0, -180.0, -90.0, 180.0)
    }

    /// Whether the coordinate lies within these bounds.
    ///
    /// Inclusive on all four boundaries. A point exactly on an edge shared by
    /// two tiles or quadrants is therefore accepted by both; the quadtree's
    /// fixed NW/NE/SW/SE insertion order is what keeps assignment unique.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        longitude >= self.west
            && longitude <= self.east
            && latitude <= self.north
            && latitude >= self.south
    }

    /// Whether two bounds overlap. Sharing an edge counts as intersecting.
    pub fn intersects(&self, other: &Self) -> bool {
        self.west <= other.east
            && self.east >= other.west
            && self.south <= other.north
            && self.north >= other.south
    }
}

/// `geo::Rect` stores longitude in `x` and latitude in `y`.
impl From<LatLngBounds> for geo::Rect<f64> {
    fn from(bounds: LatLngBounds) -> Self {
        geo::Rect::new(
            geo::coord! { x: bounds.west, y: bounds.south },
            geo::coord! { x: bounds.east, y: bounds.north },
        )
    }
}

impl From<geo::Rect<f64>> for LatLngBounds {
    fn from(rect: geo::Rect<f64>) -> Self {
        Self::new(rect.max().y, rect.min().x, rect.min().y, rect.max().x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inclusive_edges() {
        let bounds = LatLngBounds::new(10.0, -10.0, -10.0, 10.0);

        assert!(bounds.contains(0.0, 0.0));
        // All four edges and corners are inclusive.
        assert!(bounds.contains(10.0, 0.0));
        assert!(bounds.contains(-10.0, 0.0));
        assert!(bounds.contains(0.0, -10.0));
        assert!(bounds.contains(0.0, 10.0));
        assert!(bounds.contains(10.0, 10.0));

        assert!(!bounds.contains(10.0001, 0.0));
        assert!(!bounds.contains(0.0, -10.0001));
    }

    #[test]
    fn test_intersects() {
        let a = LatLngBounds::new(10.0, -10.0, -10.0, 10.0);
        let b = LatLngBounds::new(15.0, 5.0, 5.0, 15.0);
        let c = LatLngBounds::new(50.0, 40.0, 40.0, 50.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_intersects_shared_edge() {
        let a = LatLngBounds::new(10.0, -10.0, -10.0, 10.0);
        let b = LatLngBounds::new(10.0, 10.0, -10.0, 30.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_world_domain() {
        let world = LatLngBounds::world();
        assert!(world.contains(90.0, 180.0));
        assert!(world.contains(-90.0, -180.0));
        assert!(!world.contains(90.1, 0.0));
        assert!(!world.contains(0.0, 180.1));
    }

    #[test]
    fn test_geo_rect_round_trip() {
        let bounds = LatLngBounds::new(40.8, -74.1, 40.6, -73.9);
        let rect: geo::Rect<f64> = bounds.into();
        assert_eq!(LatLngBounds::from(rect), bounds);
    }
}
