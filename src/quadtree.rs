//! Region quadtree over the fixed latitude/longitude domain.
//!
//! The tree maps the full Earth extent (N90/W-180/S-90/E180) to a dynamic set
//! of points and supports insertion and axis-aligned rectangular range
//! queries. It is a pure data structure with no internal synchronization;
//! callers must serialize mutation against queries. The cluster engine does
//! this by running rebuild and clustering on a single worker.

use smallvec::SmallVec;

use crate::geometry::LatLngBounds;
use crate::item::ClusterItem;

/// Bucket capacity used by [`QuadTree::default`] and [`Config::default`](crate::Config).
pub const DEFAULT_BUCKET_CAPACITY: usize = 4;

/// A quadtree node: a bucket of points plus, once subdivided, four children
/// partitioning its bounds into equal quadrants.
///
/// Invariant: a leaf holds at most `bucket_capacity` points; a subdivided
/// node holds exactly `bucket_capacity` points, frozen at the moment of
/// subdivision. Children are never removed or merged.
struct Node<T> {
    bounds: LatLngBounds,
    points: SmallVec<[T; DEFAULT_BUCKET_CAPACITY]>,
    /// NW, NE, SW, SE. The order is load-bearing: it breaks ties for points
    /// on shared quadrant boundaries and fixes the query traversal order.
    children: Option<Box<[Node<T>; 4]>>,
}

impl<T: ClusterItem> Node<T> {
    fn new(bounds: LatLngBounds) -> Self {
        Self {
            bounds,
            points: SmallVec::new(),
            children: None,
        }
    }

    fn insert(&mut self, point: T, bucket_capacity: usize) -> bool {
        let (latitude, longitude) = (point.latitude(), point.longitude());

        // Ignore points that do not belong in this node.
        if !self.bounds.contains(latitude, longitude) {
            return false;
        }

        // If there is space in this bucket, store the point here. A
        // subdivided node is already at capacity, so this only appends to
        // leaves.
        if self.points.len() < bucket_capacity {
            self.points.push(point);
            return true;
        }

        if self.children.is_none() {
            self.subdivide();
        }

        // The children partition these bounds, so the first quadrant whose
        // bounds contain the point takes it. NW-first order makes boundary
        // ties deterministic.
        let children = self.children.as_mut().expect("subdivided above");
        for child in children.iter_mut() {
            if child.bounds.contains(latitude, longitude) {
                return child.insert(point, bucket_capacity);
            }
        }

        // Unreachable for points within this node's bounds.
        false
    }

    fn query_range<'a>(&'a self, range: &LatLngBounds, out: &mut Vec<&'a T>) {
        // Abort early if the range does not intersect this quad.
        if !self.bounds.intersects(range) {
            return;
        }

        // Points stored at this level first, then the subtrees, giving a
        // stable pre-order result for a given tree state.
        for point in &self.points {
            if range.contains(point.latitude(), point.longitude()) {
                out.push(point);
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_range(range, out);
            }
        }
    }

    fn subdivide(&mut self) {
        let bounds = &self.bounds;
        let lat_half = bounds.north - (bounds.north - bounds.south) / 2.0;
        let lon_half = bounds.east - (bounds.east - bounds.west) / 2.0;

        self.children = Some(Box::new([
            Node::new(LatLngBounds::new(
                bounds.north,
                bounds.west,
                lat_half,
                lon_half,
            )),
            Node::new(LatLngBounds::new(
                bounds.north,
                lon_half,
                lat_half,
                bounds.east,
            )),
            Node::new(LatLngBounds::new(
                lat_half,
                bounds.west,
                bounds.south,
                lon_half,
            )),
            Node::new(LatLngBounds::new(
                lat_half,
                lon_half,
                bounds.south,
                bounds.east,
            )),
        ]));
    }
}

/// A region quadtree over the full latitude/longitude domain.
///
/// # Example
///
/// ```rust
/// use geocluster::{LatLngBounds, QuadTree};
/// use geo::Point;
///
/// let mut tree = QuadTree::default();
/// assert!(tree.insert(Point::new(-74.0060, 40.7128)));
/// assert!(!tree.insert(Point::new(-200.0, 40.0))); // outside the domain
///
/// let hits = tree.query_range(&LatLngBounds::new(41.0, -75.0, 40.0, -73.0));
/// assert_eq!(hits.len(), 1);
/// ```
pub struct QuadTree<T> {
    bucket_capacity: usize,
    len: usize,
    root: Node<T>,
}

impl<T: ClusterItem> QuadTree<T> {
    /// Create an empty tree with the given bucket capacity.
    ///
    /// A capacity of zero would subdivide forever on the first insert, so it
    /// is treated as the default capacity instead. Prefer validating through
    /// [`Config::validate`](crate::Config::validate) at the boundary.
    pub fn new(bucket_capacity: usize) -> Self {
        let bucket_capacity = if bucket_capacity == 0 {
            DEFAULT_BUCKET_CAPACITY
        } else {
            bucket_capacity
        };
        Self {
            bucket_capacity,
            len: 0,
            root: Node::new(LatLngBounds::world()),
        }
    }

    /// The bucket capacity this tree was created with.
    pub fn bucket_capacity(&self) -> usize {
        self.bucket_capacity
    }

    /// Number of points currently indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a point.
    ///
    /// Returns `false` with no side effect when the point's coordinates fall
    /// outside the fixed domain; callers relying on every point being
    /// indexed must validate coordinates beforehand.
    pub fn insert(&mut self, point: T) -> bool {
        let inserted = self.root.insert(point, self.bucket_capacity);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// All points lying within `range`.
    ///
    /// `range` must not wrap the antimeridian (`west <= east`); callers with
    /// a wrapping viewport pre-split it, as the tile clusterer does. Result
    /// order is the tree's pre-order traversal: a node's own points first,
    /// then the NW, NE, SW, SE subtrees.
    pub fn query_range(&self, range: &LatLngBounds) -> Vec<&T> {
        let mut points = Vec::new();
        self.root.query_range(range, &mut points);
        points
    }

    /// Reset to a single empty root with the original domain and capacity.
    ///
    /// The only mutation path besides [`insert`](Self::insert); a rebuild is
    /// `clear` followed by re-inserting the full working set.
    pub fn clear(&mut self) {
        self.root = Node::new(LatLngBounds::world());
        self.len = 0;
    }
}

impl<T: ClusterItem> Default for QuadTree<T> {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_CAPACITY)
    }
}

impl<T> std::fmt::Debug for QuadTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadTree")
            .field("bucket_capacity", &self.bucket_capacity)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    fn world() -> LatLngBounds {
        LatLngBounds::world()
    }

    #[test]
    fn test_insert_and_query() {
        let mut tree = QuadTree::default();
        assert!(tree.insert(Point::new(-74.0060, 40.7128)));
        assert!(tree.insert(Point::new(-118.2437, 34.0522)));
        assert_eq!(tree.len(), 2);

        let nyc_area = LatLngBounds::new(41.0, -75.0, 40.0, -73.0);
        let hits = tree.query_range(&nyc_area);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].latitude(), 40.7128);

        assert_eq!(tree.query_range(&world()).len(), 2);
    }

    #[test]
    fn test_insert_outside_domain() {
        let mut tree = QuadTree::default();
        assert!(!tree.insert(Point::new(0.0, 90.1)));
        assert!(!tree.insert(Point::new(180.1, 0.0)));
        assert!(tree.is_empty());

        // Domain edges are inclusive.
        assert!(tree.insert(Point::new(180.0, 90.0)));
        assert!(tree.insert(Point::new(-180.0, -90.0)));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_subdivision_keeps_all_points() {
        let mut tree = QuadTree::new(2);
        for i in 0..50 {
            let offset = f64::from(i) * 0.01;
            assert!(tree.insert(Point::new(10.0 + offset, 20.0 + offset)));
        }
        assert_eq!(tree.len(), 50);
        assert_eq!(tree.query_range(&world()).len(), 50);
    }

    #[test]
    fn test_duplicate_coordinates_overflow_bucket() {
        // Identical coordinates always land in the same quadrant chain; the
        // bucket freezes at capacity and descendants absorb the rest.
        let mut tree = QuadTree::new(4);
        for _ in 0..20 {
            assert!(tree.insert(Point::new(5.0, 5.0)));
        }
        assert_eq!(tree.query_range(&world()).len(), 20);
    }

    #[test]
    fn test_boundary_point_indexed_once() {
        // Force subdivision of the root, then insert a point exactly on the
        // quadrant boundary (the equator/prime-meridian crossing).
        let mut tree = QuadTree::new(1);
        assert!(tree.insert(Point::new(-90.0, 45.0)));
        assert!(tree.insert(Point::new(0.0, 0.0)));
        assert!(tree.insert(Point::new(90.0, -45.0)));

        let hits = tree.query_range(&world());
        assert_eq!(hits.len(), 3);

        // The boundary point shows up exactly once in a query covering all
        // four quadrants around it.
        let around_origin = LatLngBounds::new(1.0, -1.0, -1.0, 1.0);
        assert_eq!(tree.query_range(&around_origin).len(), 1);
    }

    #[test]
    fn test_query_range_is_preorder_stable() {
        let mut tree = QuadTree::new(2);
        let points = [
            Point::new(10.0, 10.0),
            Point::new(11.0, 11.0),
            Point::new(12.0, 12.0),
            Point::new(-10.0, -10.0),
        ];
        for point in points {
            tree.insert(point);
        }

        let first: Vec<Point> = tree.query_range(&world()).into_iter().copied().collect();
        let second: Vec<Point> = tree.query_range(&world()).into_iter().copied().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_clear_resets_tree() {
        let mut tree = QuadTree::new(2);
        for i in 0..10 {
            tree.insert(Point::new(f64::from(i), f64::from(i)));
        }
        assert_eq!(tree.len(), 10);

        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.query_range(&world()).is_empty());
        assert_eq!(tree.bucket_capacity(), 2);

        // Re-inserting after clear yields the same query results.
        for i in 0..10 {
            assert!(tree.insert(Point::new(f64::from(i), f64::from(i))));
        }
        assert_eq!(tree.query_range(&world()).len(), 10);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let tree: QuadTree<Point> = QuadTree::new(0);
        assert_eq!(tree.bucket_capacity(), DEFAULT_BUCKET_CAPACITY);
    }

    #[test]
    fn test_query_matches_brute_force() {
        let mut tree = QuadTree::default();
        let mut points = Vec::new();
        // Deterministic pseudo-grid, no RNG needed at unit level.
        for i in 0..20 {
            for j in 0..20 {
                let point = Point::new(-180.0 + f64::from(i) * 18.5, -90.0 + f64::from(j) * 9.3);
                if tree.insert(point) {
                    points.push(point);
                }
            }
        }

        let range = LatLngBounds::new(60.0, -120.0, -30.0, 90.0);
        let mut expected: Vec<Point> = points
            .iter()
            .filter(|p| range.contains(p.latitude(), p.longitude()))
            .copied()
            .collect();
        let mut actual: Vec<Point> = tree.query_range(&range).into_iter().copied().collect();

        let key = |p: &Point| (p.x().to_bits(), p.y().to_bits());
        expected.sort_by_key(key);
        actual.sort_by_key(key);
        assert_eq!(actual, expected);
    }
}
