//! The asynchronous cluster engine.
//!
//! `ClusterEngine` owns a single background worker thread that runs index
//! rebuilds and clustering passes sequentially, so quadtree mutation and
//! queries never interleave. Starting a new task supersedes any uncompleted
//! task of the same kind: each task kind carries a generation counter, a job
//! checks it is still the latest generation before running, and again before
//! publishing its result. Superseded results are discarded, never observed.
//!
//! A completed rebuild triggers exactly one clustering pass with the
//! then-current camera, mirroring the map idiom of re-clustering once the
//! working set changes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use std::time::Instant;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::cluster::Cluster;
use crate::config::Config;
use crate::error::{ClusterError, Result};
use crate::geometry::LatLngBounds;
use crate::item::ClusterItem;
use crate::quadtree::QuadTree;
use crate::tiles::clusters_for_viewport;

/// Viewport and zoom captured from the host map's camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The visible region. `west > east` means the viewport crosses the
    /// ±180° antimeridian.
    pub viewport: LatLngBounds,
    /// Map zoom level, finite and non-negative.
    pub zoom: f64,
}

type ClusterCallback<T> = Box<dyn FnMut(Vec<Cluster<T>>) + Send>;

enum Job<T> {
    Rebuild { items: Vec<T>, generation: u64 },
    Cluster { camera: Camera, generation: u64 },
    Shutdown,
}

/// Latest-generation counters, one per task kind. The kinds do not
/// cross-cancel each other.
struct Generations {
    rebuild: AtomicU64,
    cluster: AtomicU64,
}

/// Builder for a [`ClusterEngine`], following the same pattern the
/// configuration surface uses elsewhere: set everything up front, validate
/// eagerly in `build`.
pub struct ClusterEngineBuilder<T> {
    config: Config,
    on_clusters: Option<ClusterCallback<T>>,
}

impl<T: ClusterItem + Clone + Send + 'static> ClusterEngineBuilder<T> {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            on_clusters: None,
        }
    }

    /// Set the clustering configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the callback invoked with the result of each completed (and not
    /// superseded) clustering pass. Called on the worker thread.
    pub fn on_clusters(mut self, callback: impl FnMut(Vec<Cluster<T>>) + Send + 'static) -> Self {
        self.on_clusters = Some(Box::new(callback));
        self
    }

    /// Validate the configuration and start the worker.
    pub fn build(self) -> Result<ClusterEngine<T>> {
        self.config.validate()?;

        let (sender, receiver) = channel();
        let generations = Arc::new(Generations {
            rebuild: AtomicU64::new(0),
            cluster: AtomicU64::new(0),
        });
        let camera = Arc::new(Mutex::new(None));

        let worker = Worker {
            tree: QuadTree::new(self.config.bucket_capacity),
            min_cluster_size: self.config.min_cluster_size,
            generations: Arc::clone(&generations),
            camera: Arc::clone(&camera),
            on_clusters: self.on_clusters.unwrap_or_else(|| Box::new(|_| {})),
        };
        let handle = std::thread::Builder::new()
            .name("geocluster-worker".to_string())
            .spawn(move || worker.run(receiver))
            .map_err(|e| ClusterError::InvalidConfig(format!("failed to spawn worker: {e}")))?;

        Ok(ClusterEngine {
            sender,
            worker: Some(handle),
            generations,
            camera,
            config: self.config,
        })
    }
}

impl<T: ClusterItem + Clone + Send + 'static> Default for ClusterEngineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Groups items into clusters off the caller's thread.
///
/// # Example
///
/// ```rust
/// use geocluster::{ClusterEngine, Config, LatLngBounds};
/// use geo::Point;
/// use std::sync::mpsc::channel;
///
/// let (tx, rx) = channel();
/// let engine = ClusterEngine::builder()
///     .config(Config::default())
///     .on_clusters(move |clusters| {
///         let _ = tx.send(clusters);
///     })
///     .build()?;
///
/// engine.set_camera(LatLngBounds::new(60.0, -10.0, 40.0, 30.0), 6.0)?;
/// engine.set_items(vec![
///     Point::new(13.40, 52.52),
///     Point::new(13.41, 52.53),
/// ])?;
///
/// let clusters = rx.recv().unwrap();
/// assert_eq!(clusters.iter().map(|c| c.items().len()).sum::<usize>(), 2);
/// # Ok::<(), geocluster::ClusterError>(())
/// ```
pub struct ClusterEngine<T: ClusterItem + Clone + Send + 'static> {
    sender: Sender<Job<T>>,
    worker: Option<JoinHandle<()>>,
    generations: Arc<Generations>,
    camera: Arc<Mutex<Option<Camera>>>,
    config: Config,
}

impl<T: ClusterItem + Clone + Send + 'static> ClusterEngine<T> {
    pub fn builder() -> ClusterEngineBuilder<T> {
        ClusterEngineBuilder::new()
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the full working set and schedule an asynchronous rebuild.
    ///
    /// The rebuild supersedes any uncompleted rebuild and, on completion,
    /// triggers one clustering pass with the current camera (if one has been
    /// set). Items outside the lat/lon domain are dropped with a warning.
    pub fn set_items(&self, items: Vec<T>) -> Result<()> {
        let generation = self.generations.rebuild.fetch_add(1, Ordering::SeqCst) + 1;
        self.sender
            .send(Job::Rebuild { items, generation })
            .map_err(|_| ClusterError::EngineStopped)
    }

    /// Record the current camera position.
    ///
    /// Cheap and synchronous; it does not schedule any work. Call
    /// [`request_clusters`](Self::request_clusters) when the camera comes to
    /// rest.
    pub fn set_camera(&self, viewport: LatLngBounds, zoom: f64) -> Result<()> {
        if !zoom.is_finite() || zoom < 0.0 {
            return Err(ClusterError::InvalidZoom(zoom));
        }
        *self.camera.lock() = Some(Camera { viewport, zoom });
        Ok(())
    }

    /// Schedule a clustering pass for the current camera (the camera-idle
    /// trigger). Supersedes any uncompleted clustering pass.
    pub fn request_clusters(&self) -> Result<()> {
        let camera = (*self.camera.lock()).ok_or(ClusterError::NoCamera)?;
        let generation = self.generations.cluster.fetch_add(1, Ordering::SeqCst) + 1;
        self.sender
            .send(Job::Cluster { camera, generation })
            .map_err(|_| ClusterError::EngineStopped)
    }

    /// Stop the worker and wait for it to finish. Equivalent to dropping the
    /// engine; queued but superseded tasks are discarded without running.
    pub fn shutdown(self) {}
}

impl<T: ClusterItem + Clone + Send + 'static> Drop for ClusterEngine<T> {
    fn drop(&mut self) {
        let _ = self.sender.send(Job::Shutdown);
        if let Some(handle) = self.worker.take()
            && handle.join().is_err()
        {
            warn!("cluster engine worker panicked during shutdown");
        }
    }
}

/// Worker-thread state: exclusive owner of the quadtree.
struct Worker<T: ClusterItem> {
    tree: QuadTree<T>,
    min_cluster_size: usize,
    generations: Arc<Generations>,
    camera: Arc<Mutex<Option<Camera>>>,
    on_clusters: ClusterCallback<T>,
}

impl<T: ClusterItem + Clone> Worker<T> {
    fn run(mut self, receiver: Receiver<Job<T>>) {
        while let Ok(job) = receiver.recv() {
            match job {
                Job::Shutdown => break,
                Job::Rebuild { items, generation } => self.rebuild(items, generation),
                Job::Cluster { camera, generation } => self.cluster(camera, generation),
            }
        }
        debug!("cluster engine worker exiting");
    }

    fn rebuild(&mut self, items: Vec<T>, generation: u64) {
        if self.generations.rebuild.load(Ordering::SeqCst) != generation {
            debug!("skipping superseded rebuild (generation {generation})");
            return;
        }

        let start = Instant::now();
        let total = items.len();
        self.tree.clear();
        for item in items {
            self.tree.insert(item);
        }
        let dropped = total - self.tree.len();
        if dropped > 0 {
            warn!("rebuild dropped {dropped} of {total} items outside the lat/lon domain");
        }
        debug!(
            "rebuilt quadtree with {} items in {:?}",
            self.tree.len(),
            start.elapsed()
        );

        // One clustering pass with the then-current camera. Takes a fresh
        // generation so it supersedes any clustering pass queued before the
        // rebuild finished.
        let camera = *self.camera.lock();
        if let Some(camera) = camera {
            let generation = self.generations.cluster.fetch_add(1, Ordering::SeqCst) + 1;
            self.cluster(camera, generation);
        }
    }

    fn cluster(&mut self, camera: Camera, generation: u64) {
        if self.generations.cluster.load(Ordering::SeqCst) != generation {
            debug!("skipping superseded clustering pass (generation {generation})");
            return;
        }

        let start = Instant::now();
        match clusters_for_viewport(&self.tree, &camera.viewport, camera.zoom, self.min_cluster_size)
        {
            Ok(clusters) => {
                // Publish only while still the latest generation; a result
                // superseded mid-pass is discarded, never observed.
                if self.generations.cluster.load(Ordering::SeqCst) == generation {
                    debug!(
                        "clustering pass produced {} clusters in {:?}",
                        clusters.len(),
                        start.elapsed()
                    );
                    (self.on_clusters)(clusters);
                } else {
                    debug!("discarding superseded clustering result (generation {generation})");
                }
            }
            // Zoom is validated in set_camera; this only fires for callers
            // bypassing it.
            Err(e) => warn!("clustering pass failed: {e}"),
        }
    }
}
