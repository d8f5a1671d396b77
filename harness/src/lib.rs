//! Lazyfront Harness: grid worlds and routing on top of the search core.
//!
//! The harness adapts concrete worlds to the core's callback contracts
//! (`get_sorted_neighbors`, `is_solution`, `cost_add`) and records what a run
//! expanded. The search core knows nothing about grids; worlds provide data
//! only, the router owns the adaptation.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod router;
pub mod trace;
pub mod worlds;

pub use router::{GridRouter, Heuristic, RouteError};
pub use trace::{ExpansionTrace, TraceError, TracedEdge, TracedRoute};
pub use worlds::grid::{Cell, GridError, GridWorld};
pub use worlds::scenarios::{barrier_grid, cross_grid, split_grid, Scenario};
