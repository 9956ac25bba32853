//! Minimal synchronous use: index points, cluster one viewport.
//!
//! Run with `cargo run --example getting_started`.

use geo::Point;
use geocluster::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let mut tree = QuadTree::default();
    let cities = [
        ("New York", 40.7128, -74.0060),
        ("Brooklyn", 40.6782, -73.9442),
        ("Queens", 40.7306, -73.9356),
        ("Los Angeles", 34.0522, -118.2437),
        ("London", 51.5074, -0.1278),
    ];
    for (name, lat, lon) in cities {
        if !tree.insert(Point::new(lon, lat)) {
            eprintln!("{name} is outside the lat/lon domain");
        }
    }

    // A viewport over the north-eastern US at street-level zoom.
    let viewport = LatLngBounds::new(41.0, -75.0, 40.0, -73.0);
    let clusters = clusters_for_viewport(&tree, &viewport, 8.0, 1)?;

    for cluster in &clusters {
        println!(
            "cluster at ({:.4}, {:.4}) with {} item(s)",
            cluster.latitude(),
            cluster.longitude(),
            cluster.items().len()
        );
    }

    Ok(())
}
