//! Lazyfront Search: lazy best-first search over expensive, sorted successor streams.
//!
//! Successors of a state are produced as a sorted sequence and only pulled
//! when they could be the next cheapest candidate. The frontier is a heap of
//! such sequences keyed by their current head, so expanding a state with a
//! huge (or infinite) successor set costs one pull, not one per successor.
//!
//! # Crate dependency graph
//!
//! ```text
//! lazyfront_search  ←  lazyfront_harness
//! (frontier, driver)    (grid worlds, routing, traces)
//! ```
//!
//! # Key types
//!
//! - [`SortedSequence`]: ascending-by-cost producer of `(cost, value)` pairs
//! - [`LazyFrontier`]: min-heap of sequences; sequential or worker-backed
//! - [`CostMemo`]: best-known cost per state for dominance pruning
//! - [`SearchPolicy`]: pruning, iteration cap and worker configuration
//! - [`best_first_search`]: lazy iterator of solutions in cost order

#![forbid(unsafe_code)]

pub mod concurrent;
pub mod error;
pub mod frontier;
pub mod memo;
pub mod path;
pub mod policy;
pub mod search;
pub mod sequence;

pub use concurrent::ConcurrentFrontier;
pub use error::{BoxError, SearchError};
pub use frontier::{new_frontier, FrontierStats, LazyFrontier, SequentialFrontier};
pub use memo::CostMemo;
pub use path::Path;
pub use policy::{SearchPolicy, MAX_WORKERS};
pub use search::{best_first_search, first_solution, Solution, Solutions, Termination};
pub use sequence::{Cursor, Fallible, InOrder, PullTurn, SortedSequence};
