//! Camera-driven flow with the asynchronous engine: set items once, then
//! re-cluster as the camera moves and idles.
//!
//! Run with `RUST_LOG=debug cargo run --example viewport_clustering`.

use std::sync::mpsc::channel;
use std::time::Duration;

use geo::Point;
use geocluster::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let (tx, rx) = channel();
    let engine = ClusterEngine::builder()
        .config(Config::default().with_min_cluster_size(2))
        .on_clusters(move |clusters| {
            let _ = tx.send(clusters);
        })
        .build()?;

    // A band of markers across central Europe.
    let items: Vec<Point> = (0..10_000)
        .map(|i| {
            let t = f64::from(i) / 10_000.0;
            Point::new(2.0 + t * 20.0, 45.0 + (t * 400.0).sin() * 5.0)
        })
        .collect();

    engine.set_camera(LatLngBounds::new(55.0, 0.0, 40.0, 25.0), 5.0)?;
    engine.set_items(items)?;

    // The rebuild publishes one pass for the camera set above.
    let overview = rx.recv_timeout(Duration::from_secs(10)).expect("clusters");
    println!("zoom 5: {} clusters", overview.len());

    // Zoom in and idle; the engine re-clusters at finer granularity.
    engine.set_camera(LatLngBounds::new(48.0, 8.0, 45.0, 12.0), 10.0)?;
    engine.request_clusters()?;
    let detail = rx.recv_timeout(Duration::from_secs(10)).expect("clusters");
    println!("zoom 10: {} clusters", detail.len());

    engine.shutdown();
    Ok(())
}
