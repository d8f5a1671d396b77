//! Shortest-path routing on a grid world.
//!
//! The router adapts a [`GridWorld`] to the search callbacks. A heuristic
//! estimate `h` is folded into edge costs as `w + h(next) - h(current)` and
//! the initial cost is `h(start)`, so the accumulated cost of a path ending
//! at the goal telescopes to its plain edge-weight sum. With a consistent
//! heuristic every adjusted edge cost is non-negative, which keeps the
//! per-cell successor lists valid ascending sequences.

use std::sync::{Arc, Mutex, PoisonError};

use lazyfront_search::{best_first_search, SearchError, SearchPolicy, Solution};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::trace::{ExpansionTrace, TracedEdge, TracedRoute};
use crate::worlds::grid::{Cell, GridWorld};

/// Cost-to-go estimate folded into edge costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heuristic {
    /// Uniform-cost search.
    Zero,
    /// Half the straight-line distance to the goal. Admissible and
    /// consistent on the unit-weight 8-connected grid.
    HalfEuclidean,
}

impl Heuristic {
    #[must_use]
    pub fn estimate(self, from: Cell, goal: Cell) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::HalfEuclidean => {
                let dx = f64::from(goal.0 - from.0);
                let dy = f64::from(goal.1 - from.1);
                0.5 * dx.hypot(dy)
            }
        }
    }
}

/// Errors from a routing run.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("cell {cell:?} is not part of the grid")]
    UnknownCell { cell: Cell },

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Routes between cells of one grid world.
#[derive(Debug, Clone)]
pub struct GridRouter {
    world: Arc<GridWorld>,
    heuristic: Heuristic,
}

impl GridRouter {
    #[must_use]
    pub fn new(world: GridWorld, heuristic: Heuristic) -> Self {
        Self {
            world: Arc::new(world),
            heuristic,
        }
    }

    #[must_use]
    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    #[must_use]
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Heuristic-adjusted successors of `cell`, ascending by `(cost, cell)`.
    #[must_use]
    pub fn sorted_neighbors(&self, cell: Cell, goal: Cell) -> Vec<(f64, Cell)> {
        adjusted_neighbors(&self.world, self.heuristic, cell, goal)
    }

    /// Cheapest route from `start` to `goal`, or `None` if unreachable.
    ///
    /// `worker_count == 0` searches on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownCell`] if either endpoint is missing from
    /// the world, or [`RouteError::Search`] if the search cannot start.
    pub fn route(
        &self,
        start: Cell,
        goal: Cell,
        worker_count: usize,
    ) -> Result<Option<Solution<f64, Cell>>, RouteError> {
        let world = Arc::clone(&self.world);
        let heuristic = self.heuristic;
        self.run(start, goal, worker_count, move |cell: &Cell| {
            adjusted_neighbors(&world, heuristic, *cell, goal).into_iter()
        })
    }

    /// Same as [`GridRouter::route`], but also records every produced edge.
    ///
    /// With workers, edges from different sequences interleave in whatever
    /// order the workers produced them.
    ///
    /// # Errors
    ///
    /// As [`GridRouter::route`].
    pub fn route_traced(
        &self,
        start: Cell,
        goal: Cell,
        worker_count: usize,
    ) -> Result<ExpansionTrace, RouteError> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let world = Arc::clone(&self.world);
        let heuristic = self.heuristic;
        let sink = Arc::clone(&log);
        let solution = self.run(start, goal, worker_count, move |cell: &Cell| Recording {
            from: *cell,
            inner: adjusted_neighbors(&world, heuristic, *cell, goal).into_iter(),
            log: Arc::clone(&sink),
        })?;

        let edges = std::mem::take(&mut *log.lock().unwrap_or_else(PoisonError::into_inner));
        Ok(ExpansionTrace {
            start,
            goal,
            heuristic: self.heuristic,
            worker_count,
            edges,
            route: solution.map(|s| TracedRoute {
                cost: s.cost,
                iteration: s.iteration,
                path: s.path,
            }),
        })
    }

    fn run<P, I>(
        &self,
        start: Cell,
        goal: Cell,
        worker_count: usize,
        neighbors: P,
    ) -> Result<Option<Solution<f64, Cell>>, RouteError>
    where
        P: Fn(&Cell) -> I + Send + Sync + 'static,
        I: Iterator<Item = (f64, Cell)> + Send + 'static,
    {
        for cell in [start, goal] {
            if !self.world.contains(cell) {
                return Err(RouteError::UnknownCell { cell });
            }
        }
        let policy = SearchPolicy::default().with_worker_count(worker_count);
        let mut solutions = best_first_search(
            self.heuristic.estimate(start, goal),
            start,
            neighbors,
            move |cell: &Cell| *cell == goal,
            |a: &f64, b: &f64| a + b,
            &policy,
        )?;
        let best = solutions.next().transpose()?;
        debug!(
            ?start,
            ?goal,
            worker_count,
            found = best.is_some(),
            iterations = solutions.iterations(),
            "route finished"
        );
        Ok(best)
    }
}

fn adjusted_neighbors(
    world: &GridWorld,
    heuristic: Heuristic,
    cell: Cell,
    goal: Cell,
) -> Vec<(f64, Cell)> {
    let here = heuristic.estimate(cell, goal);
    let mut neighbors: Vec<(f64, Cell)> = world
        .neighbors(cell)
        .into_iter()
        .map(|(weight, next)| (weight + heuristic.estimate(next, goal) - here, next))
        .collect();
    neighbors.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    neighbors
}

/// Successor iterator that logs each edge as it is yielded.
struct Recording<I> {
    from: Cell,
    inner: I,
    log: Arc<Mutex<Vec<TracedEdge>>>,
}

impl<I: Iterator<Item = (f64, Cell)>> Iterator for Recording<I> {
    type Item = (f64, Cell);

    fn next(&mut self) -> Option<Self::Item> {
        let (cost, to) = self.inner.next()?;
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TracedEdge {
                from: self.from,
                to,
                cost,
            });
        Some((cost, to))
    }
}
