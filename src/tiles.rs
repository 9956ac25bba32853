//! Tile-grid clustering.
//!
//! Converts a viewport plus zoom level into a list of clusters: the world is
//! partitioned into a grid of tiles sized for the zoom level, each tile
//! covering the viewport is queried against the quadtree, and the points per
//! tile are aggregated into one centroid cluster or individual singletons
//! depending on the minimum cluster size.

use crate::cluster::Cluster;
use crate::error::{ClusterError, Result};
use crate::geometry::LatLngBounds;
use crate::item::ClusterItem;
use crate::quadtree::QuadTree;

/// The tile grid for a zoom level.
///
/// `tile_count = floor(2^zoom * 2)` tiles span each axis, so the latitude
/// step is `180 / tile_count` and the longitude step `360 / tile_count`.
/// Tiles never straddle the ±180° antimeridian; the grid is laid out over
/// the linear longitude domain and wrapping viewports are pre-split by
/// [`clusters_for_viewport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGrid {
    tile_count: i64,
    lat_step: f64,
    lon_step: f64,
}

impl TileGrid {
    /// Build the grid for a zoom level.
    ///
    /// The zoom must be finite and non-negative; anything else would produce
    /// a degenerate tile count and is rejected here rather than tolerated in
    /// the loop.
    pub fn from_zoom(zoom: f64) -> Result<Self> {
        if !zoom.is_finite() || zoom < 0.0 {
            return Err(ClusterError::InvalidZoom(zoom));
        }
        let tile_count = (2.0_f64.powf(zoom) * 2.0).floor() as i64;
        Ok(Self {
            tile_count,
            lat_step: 180.0 / tile_count as f64,
            lon_step: 360.0 / tile_count as f64,
        })
    }

    /// Number of tiles along each axis.
    pub fn tile_count(&self) -> i64 {
        self.tile_count
    }

    /// Latitude span of one tile, in degrees.
    pub fn lat_step(&self) -> f64 {
        self.lat_step
    }

    /// Longitude span of one tile, in degrees.
    pub fn lon_step(&self) -> f64 {
        self.lon_step
    }

    /// Tile column covering the longitude. Columns count eastward from -180°.
    pub fn tile_x(&self, longitude: f64) -> i64 {
        ((longitude + 180.0) / self.lon_step) as i64
    }

    /// Tile row covering the latitude. Rows count southward from 90°.
    pub fn tile_y(&self, latitude: f64) -> i64 {
        ((90.0 - latitude) / self.lat_step) as i64
    }

    /// The exact geographic bounds of a tile.
    pub fn tile_bounds(&self, tile_x: i64, tile_y: i64) -> LatLngBounds {
        let north = 90.0 - tile_y as f64 * self.lat_step;
        let west = tile_x as f64 * self.lon_step - 180.0;
        LatLngBounds::new(north, west, north - self.lat_step, west + self.lon_step)
    }
}

/// Cluster every point visible in the viewport at the given zoom level.
///
/// A viewport whose west bound exceeds its east bound crosses the ±180°
/// antimeridian and is processed as two independent sub-passes, `[west, 180]`
/// then `[-180, east]`, with results concatenated. Output order is the tile
/// iteration order (columns west to east, rows north to south) and is
/// reproducible across calls with identical inputs.
///
/// Tiles holding at least `min_cluster_size` points emit one cluster at the
/// arithmetic mean of the member coordinates; tiles with fewer emit one
/// singleton cluster per point. Empty tiles emit nothing, so an empty index
/// yields an empty list.
///
/// # Example
///
/// ```rust
/// use geocluster::{LatLngBounds, QuadTree, clusters_for_viewport};
/// use geo::Point;
///
/// let mut tree = QuadTree::default();
/// tree.insert(Point::new(13.40, 52.52));
/// tree.insert(Point::new(13.41, 52.53));
///
/// let viewport = LatLngBounds::new(60.0, 0.0, 45.0, 30.0);
/// let clusters = clusters_for_viewport(&tree, &viewport, 5.0, 1)?;
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].items().len(), 2);
/// # Ok::<(), geocluster::ClusterError>(())
/// ```
pub fn clusters_for_viewport<T>(
    tree: &QuadTree<T>,
    viewport: &LatLngBounds,
    zoom: f64,
    min_cluster_size: usize,
) -> Result<Vec<Cluster<T>>>
where
    T: ClusterItem + Clone,
{
    let grid = TileGrid::from_zoom(zoom)?;
    let mut clusters = Vec::new();

    if viewport.west > viewport.east {
        // Antimeridian wraparound: split into two non-wrapping sub-passes.
        clusters_inside_bounds(
            tree,
            &grid,
            viewport.north,
            viewport.south,
            viewport.west,
            180.0,
            min_cluster_size,
            &mut clusters,
        );
        clusters_inside_bounds(
            tree,
            &grid,
            viewport.north,
            viewport.south,
            -180.0,
            viewport.east,
            min_cluster_size,
            &mut clusters,
        );
    } else {
        clusters_inside_bounds(
            tree,
            &grid,
            viewport.north,
            viewport.south,
            viewport.west,
            viewport.east,
            min_cluster_size,
            &mut clusters,
        );
    }

    Ok(clusters)
}

/// One sub-pass over a non-wrapping longitude span.
///
/// End indices run one past the floor conversion so partial tiles at the far
/// edges are fully covered.
#[allow(clippy::too_many_arguments)]
fn clusters_inside_bounds<T>(
    tree: &QuadTree<T>,
    grid: &TileGrid,
    north: f64,
    south: f64,
    west: f64,
    east: f64,
    min_cluster_size: usize,
    clusters: &mut Vec<Cluster<T>>,
) where
    T: ClusterItem + Clone,
{
    let start_x = grid.tile_x(west);
    let start_y = grid.tile_y(north);
    let end_x = grid.tile_x(east) + 1;
    let end_y = grid.tile_y(south) + 1;

    for tile_x in start_x..=end_x {
        for tile_y in start_y..=end_y {
            let tile = grid.tile_bounds(tile_x, tile_y);
            let points = tree.query_range(&tile);
            if points.is_empty() {
                continue;
            }

            if points.len() >= min_cluster_size {
                let mut total_latitude = 0.0;
                let mut total_longitude = 0.0;
                for point in &points {
                    total_latitude += point.latitude();
                    total_longitude += point.longitude();
                }
                let count = points.len() as f64;
                clusters.push(Cluster::new(
                    total_latitude / count,
                    total_longitude / count,
                    points.into_iter().cloned().collect(),
                    tile,
                ));
            } else {
                for point in points {
                    clusters.push(Cluster::new(
                        point.latitude(),
                        point.longitude(),
                        vec![point.clone()],
                        tile,
                    ));
                }
            }
        }
    }
}
