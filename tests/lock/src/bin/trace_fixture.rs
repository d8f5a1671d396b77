//! Binary that routes the canonical barrier scenario sequentially and prints
//! deterministic output lines for cross-process verification.
//!
//! Usage: `trace_fixture [size]` (default size 20)
//!
//! Output: key=value lines (see source for format).

use lazyfront_harness::{barrier_grid, GridRouter, Heuristic};

fn main() {
    let size = std::env::args()
        .nth(1)
        .map_or(20, |arg| arg.parse().expect("size must be an integer"));
    let scenario = barrier_grid(size).expect("invalid barrier size");
    let router = GridRouter::new(scenario.world, Heuristic::HalfEuclidean);
    let trace = router
        .route_traced(scenario.start, scenario.goal, 0)
        .expect("routing failed");
    let route = trace.route.as_ref().expect("barrier scenario is solvable");

    println!("trace_digest={}", trace.digest().expect("trace digest"));
    println!("edge_count={}", trace.edges.len());
    println!("expanded_cells={}", trace.expanded_cells().len());
    println!("route_cost={:.6}", route.cost);
    println!("route_len={}", route.path.len());
    println!("route_iteration={}", route.iteration);
    println!(
        "route_json={}",
        serde_json::to_string(&route.path).expect("route JSON")
    );
}
