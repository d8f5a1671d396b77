//! Grid lock tests: the barrier, cross and split scenarios routed with and
//! without workers, plus trace determinism for sequential runs.

use lazyfront_harness::{
    barrier_grid, cross_grid, split_grid, ExpansionTrace, GridRouter, Heuristic, Scenario,
};

const WORKER_COUNTS: [usize; 2] = [0, 4];

fn assert_optimal(scenario: &Scenario, heuristic: Heuristic, workers: usize) {
    let router = GridRouter::new(scenario.world.clone(), heuristic);
    let best = router
        .route(scenario.start, scenario.goal, workers)
        .unwrap()
        .unwrap_or_else(|| panic!("no route found with {workers} workers"));
    let expected = scenario.expected_cost.unwrap();
    assert!(
        (best.cost - expected).abs() < 1e-7,
        "cost {} != {expected} ({heuristic:?}, {workers} workers)",
        best.cost
    );
    assert_eq!(Some(best.path.len()), scenario.expected_path_len());
    assert_eq!(best.path.first(), Some(&scenario.start));
    assert_eq!(best.path.last(), Some(&scenario.goal));
    for step in best.path.windows(2) {
        let (a, b) = (step[0], step[1]);
        assert!(scenario.world.contains(b), "path crosses removed cell {b:?}");
        assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1, "{a:?} -> {b:?} is not an edge");
    }
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: GRID-BARRIER-20
// ---------------------------------------------------------------------------

#[test]
fn barrier_20_costs_31_sequential_and_concurrent() {
    let scenario = barrier_grid(20).unwrap();
    assert_eq!(scenario.expected_cost, Some(31.0));
    for workers in WORKER_COUNTS {
        assert_optimal(&scenario, Heuristic::HalfEuclidean, workers);
    }
}

#[test]
fn barrier_path_ends_at_far_corner() {
    let scenario = barrier_grid(20).unwrap();
    let router = GridRouter::new(scenario.world, Heuristic::HalfEuclidean);
    let sequential = router.route((0, 0), (20, 20), 0).unwrap().unwrap();
    for workers in WORKER_COUNTS {
        let best = router.route((0, 0), (20, 20), workers).unwrap().unwrap();
        assert_eq!(best.path.len(), 32);
        assert_eq!(best.path.last(), Some(&(20, 20)));
        assert_eq!(best, sequential, "workers {workers}");
    }
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: GRID-CROSS
// ---------------------------------------------------------------------------

#[test]
fn cross_sizes_20_to_24_match_closed_form() {
    for size in 20..25 {
        let scenario = cross_grid(size).unwrap();
        assert_optimal(&scenario, Heuristic::Zero, 0);
        assert_optimal(&scenario, Heuristic::HalfEuclidean, 0);
    }
    assert_optimal(&cross_grid(22).unwrap(), Heuristic::HalfEuclidean, 4);
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: GRID-SPLIT-NO-PATH
// ---------------------------------------------------------------------------

#[test]
fn split_grid_has_no_route() {
    let scenario = split_grid(10).unwrap();
    assert!(!scenario.world.is_connected());
    let router = GridRouter::new(scenario.world, Heuristic::HalfEuclidean);
    for workers in WORKER_COUNTS {
        assert!(router
            .route(scenario.start, scenario.goal, workers)
            .unwrap()
            .is_none());
    }
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: GRID-TRACE-DETERMINISM
// ---------------------------------------------------------------------------

#[test]
fn sequential_traces_are_byte_identical() {
    let scenario = barrier_grid(15).unwrap();
    let router = GridRouter::new(scenario.world, Heuristic::HalfEuclidean);
    let first = router.route_traced(scenario.start, scenario.goal, 0).unwrap();
    let digest = first.digest().unwrap();
    for _ in 0..5 {
        let again = router.route_traced(scenario.start, scenario.goal, 0).unwrap();
        assert_eq!(again.digest().unwrap(), digest);
    }
}

#[test]
fn concurrent_trace_finds_same_route() {
    let scenario = barrier_grid(15).unwrap();
    let router = GridRouter::new(scenario.world, Heuristic::HalfEuclidean);
    let sequential = router.route_traced(scenario.start, scenario.goal, 0).unwrap();
    let concurrent = router.route_traced(scenario.start, scenario.goal, 4).unwrap();
    let (a, b) = (sequential.route.unwrap(), concurrent.route.unwrap());
    // Edge order follows worker timing; the route itself does not.
    assert_eq!(a, b);
    assert_eq!(concurrent.worker_count, 4);
    assert!(!concurrent.edges.is_empty());
}

#[test]
fn heuristic_expands_fewer_cells_than_uniform_cost() {
    let scenario = barrier_grid(20).unwrap();
    let expanded = |heuristic| {
        GridRouter::new(scenario.world.clone(), heuristic)
            .route_traced(scenario.start, scenario.goal, 0)
            .unwrap()
            .expanded_cells()
            .len()
    };
    assert!(expanded(Heuristic::HalfEuclidean) < expanded(Heuristic::Zero));
}

#[test]
fn trace_file_round_trip_keeps_digest() {
    let scenario = barrier_grid(12).unwrap();
    let router = GridRouter::new(scenario.world, Heuristic::HalfEuclidean);
    let trace = router.route_traced(scenario.start, scenario.goal, 0).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("barrier_12.json");
    trace.write_to(&path).unwrap();
    let loaded = ExpansionTrace::read_from(&path).unwrap();
    assert_eq!(loaded.digest().unwrap(), trace.digest().unwrap());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["heuristic"], "HalfEuclidean");
    assert_eq!(raw["route"]["path"][0], serde_json::json!([0, 0]));
}
