use geonav::{
    Config, GeoBox, GeoNavError, IndexedMinHeap, KdTree, NaivePointSet, Point, PointSet,
    StreetGraph, TileResolver,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;

/// Test 1: Large dataset stress test
#[test]
fn test_large_point_set() {
    let mut rng = StdRng::seed_from_u64(7);
    let points: Vec<Point> = (0..50_000)
        .map(|_| Point::new(rng.gen_range(-180.0..180.0), rng.gen_range(-90.0..90.0)))
        .collect();

    let tree = KdTree::new(points.iter().copied()).expect("Failed to build tree");
    let naive = NaivePointSet::new(points.iter().copied()).expect("Failed to build point set");
    assert_eq!(tree.len(), 50_000);

    for _ in 0..200 {
        let (x, y) = (rng.gen_range(-200.0..200.0), rng.gen_range(-100.0..100.0));
        let expected = naive.nearest_entry(x, y).distance;
        let found = tree.nearest_entry(x, y).distance;
        assert!((expected - found).abs() < 1e-9);
    }
}

/// Test 2: Points inserted in sorted order degenerate the tree without
/// overflowing the stack
#[test]
fn test_sorted_insertion_does_not_overflow() {
    let points = (0..10_000).map(|i| Point::new(i as f64, i as f64));
    let tree = KdTree::new(points).expect("Failed to build tree");

    assert_eq!(tree.nearest(9_999.4, 9_999.4), Point::new(9_999.0, 9_999.0));
    assert_eq!(tree.nearest(-5.0, -5.0), Point::new(0.0, 0.0));
}

/// Test 3: Extreme coordinate values
#[test]
fn test_extreme_coordinates() {
    let corners = [
        Point::new(0.0, 90.0),
        Point::new(0.0, -90.0),
        Point::new(180.0, 0.0),
        Point::new(-180.0, 0.0),
    ];
    let tree = KdTree::new(corners).expect("Failed to build tree");

    assert_eq!(tree.nearest(1.0, 89.0), Point::new(0.0, 90.0));
    assert_eq!(tree.nearest(-179.0, 1.0), Point::new(-180.0, 0.0));
    // Queries far outside the data still answer
    assert_eq!(tree.nearest(1e9, 0.0), Point::new(180.0, 0.0));
}

/// Test 4: Non-finite input is rejected everywhere
#[test]
fn test_non_finite_input() {
    assert!(matches!(
        KdTree::new([Point::new(f64::NAN, 0.0)]),
        Err(GeoNavError::InvalidInput(_))
    ));
    assert!(matches!(
        KdTree::new(std::iter::empty()),
        Err(GeoNavError::InvalidInput(_))
    ));

    let resolver = TileResolver::new(&Config::default()).expect("Failed to create resolver");
    let bbox = GeoBox::new(f64::NEG_INFINITY, 37.9, -122.2, 37.8);
    assert!(matches!(
        resolver.resolve_tiles(&bbox, 512.0, 512.0),
        Err(GeoNavError::InvalidInput(_))
    ));
    assert!(matches!(
        resolver.resolve_tiles(resolver.root(), f64::NAN, 512.0),
        Err(GeoNavError::InvalidInput(_))
    ));
}

/// Test 5: Heap under heavy priority churn
#[test]
fn test_heap_priority_churn() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut heap = IndexedMinHeap::new();
    for i in 0..2_000u32 {
        heap.add(i, rng.gen_range(0.0..1_000.0)).expect("Failed to add");
    }
    for _ in 0..10_000 {
        let item = rng.gen_range(0..2_000u32);
        heap.change_priority(&item, rng.gen_range(-1_000.0..1_000.0))
            .expect("Item should be present");
    }

    let mut last = f64::NEG_INFINITY;
    while !heap.is_empty() {
        let top = *heap.peek_min().expect("Heap not empty");
        let priority = heap.priority(&top).expect("Top has a priority");
        assert!(priority >= last);
        last = priority;
        heap.remove_min().expect("Heap not empty");
    }
    assert!(matches!(heap.remove_min(), Err(GeoNavError::Empty)));
}

/// Test 6: Concurrent readers share built structures
#[test]
fn test_concurrent_readers() {
    let graph = {
        let mut builder = StreetGraph::builder();
        for i in 0..50u64 {
            builder = builder.node(i, -122.25 + i as f64 * 0.001, 37.87);
        }
        builder
            .way(&(0..50).collect::<Vec<_>>())
            .build()
            .expect("Failed to build graph")
    };
    let resolver = TileResolver::new(&Config::default()).expect("Failed to create resolver");

    thread::scope(|s| {
        for t in 0..8 {
            let graph = &graph;
            let resolver = &resolver;
            s.spawn(move || {
                let route = graph
                    .shortest_path(-122.25, 37.87, -122.25 + 0.049, 37.87)
                    .expect("Routing failed");
                assert_eq!(route.solution().len(), 50);

                let raster = resolver
                    .resolve_tiles(resolver.root(), 256.0 * (t + 1) as f64, 256.0)
                    .expect("Resolve failed");
                assert!(raster.query_success);
            });
        }
    });
}
