use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geo::Point;
use geocluster::{LatLngBounds, QuadTree, clusters_for_viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(seed: u64, count: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Point::new(rng.gen_range(-180.0..=180.0), rng.gen_range(-90.0..=90.0)))
        .collect()
}

fn build_tree(points: &[Point]) -> QuadTree<Point> {
    let mut tree = QuadTree::default();
    for point in points {
        tree.insert(*point);
    }
    tree
}

fn benchmark_quadtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree");

    for &count in &[10_000usize, 100_000] {
        let points = random_points(1, count);

        group.bench_with_input(BenchmarkId::new("rebuild", count), &points, |b, points| {
            let mut tree = QuadTree::default();
            b.iter(|| {
                tree.clear();
                for point in points {
                    tree.insert(black_box(*point));
                }
            })
        });

        let tree = build_tree(&points);
        let rect = LatLngBounds::new(55.0, -10.0, 35.0, 30.0);
        group.bench_with_input(BenchmarkId::new("query_range", count), &tree, |b, tree| {
            b.iter(|| tree.query_range(black_box(&rect)))
        });
    }

    group.finish();
}

fn benchmark_clustering(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");
    group.sample_size(20);

    let points = random_points(2, 100_000);
    let tree = build_tree(&points);
    let viewport = LatLngBounds::new(70.0, -130.0, 20.0, 40.0);

    for &zoom in &[3.0f64, 8.0, 12.0] {
        group.bench_with_input(
            BenchmarkId::new("clusters_for_viewport", zoom as i64),
            &zoom,
            |b, &zoom| {
                b.iter(|| clusters_for_viewport(&tree, black_box(&viewport), zoom, 1).unwrap())
            },
        );
    }

    // Wrapping viewport runs two sub-passes.
    let seam_viewport = LatLngBounds::new(45.0, 170.0, -45.0, -170.0);
    group.bench_function("clusters_antimeridian", |b| {
        b.iter(|| clusters_for_viewport(&tree, black_box(&seam_viewport), 6.0, 1).unwrap())
    });

    group.finish();
}

criterion_group!(benches, benchmark_quadtree, benchmark_clustering);
criterion_main!(benches);
