//! Search entry point and expansion loop.
//!
//! The driver seeds the frontier with the initial state, then repeatedly pops
//! the cheapest partial path. A path ending in a solution state is yielded;
//! any other path is expanded by pushing one lazily evaluated sequence of its
//! successors back into the frontier.
//!
//! Dominance pruning happens while that successor sequence is walked, i.e.
//! at push time: a candidate whose state already has an equal or cheaper
//! known cost never enters the heap. Memo decisions are taken in pull issue
//! order (see [`PullTurn`]), so a worker-backed frontier admits exactly the
//! candidates the sequential one does and yields the same solutions.

use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use crate::error::SearchError;
use crate::frontier::{new_frontier, FrontierStats, LazyFrontier};
use crate::memo::CostMemo;
use crate::path::Path;
use crate::policy::SearchPolicy;
use crate::sequence::{Cursor, InOrder, PullTurn, SortedSequence};

type NeighborFn<C, N> = dyn Fn(&N) -> Cursor<C, N> + Send + Sync;
type CostAddFn<C> = dyn Fn(&C, &C) -> C + Send + Sync;

/// A found solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<C, N> {
    /// Accumulated cost of the path.
    pub cost: C,
    /// Zero-based index of the frontier pop that surfaced the solution.
    pub iteration: u64,
    /// States from the initial state to the solution state.
    pub path: Vec<N>,
}

/// Why a solution iterator stopped producing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The reachable space was fully explored.
    Exhausted,
    /// `max_iterations` frontier pops were spent.
    IterationCap,
    /// A producer error was returned to the caller.
    Failed,
}

/// State shared by every expansion of one search.
struct Expander<C, N> {
    neighbors: Box<NeighborFn<C, N>>,
    cost_add: Box<CostAddFn<C>>,
    memo: Option<Mutex<CostMemo<N, C>>>,
}

/// Successor sequence of one popped path.
///
/// Walks the caller's sorted neighbors lazily, combines costs, and applies
/// dominance pruning per candidate exactly once, when it would be pushed.
struct Expansion<C, N> {
    expander: Arc<Expander<C, N>>,
    cost: C,
    path: Path<N>,
    neighbors: Option<Cursor<C, N>>,
}

impl<C, N> SortedSequence<C, Path<N>> for Expansion<C, N>
where
    C: PartialOrd + Clone + Send,
    N: Eq + Hash + Clone + Send + Sync,
{
    fn next_pair(&mut self) -> Result<Option<(C, Path<N>)>, SearchError> {
        self.next_pair_in_turn(&mut InOrder)
    }

    fn next_pair_in_turn(
        &mut self,
        turn: &mut dyn PullTurn,
    ) -> Result<Option<(C, Path<N>)>, SearchError> {
        let expander = &self.expander;
        let neighbors = self
            .neighbors
            .get_or_insert_with(|| (expander.neighbors)(self.path.last()));
        while let Some((step, next)) = neighbors.pull()? {
            let total = (expander.cost_add)(&self.cost, &step);
            if let Some(memo) = &expander.memo {
                // Admission order must not depend on which worker gets here first.
                turn.wait()?;
                let mut memo = memo.lock().unwrap_or_else(PoisonError::into_inner);
                if !memo.admit(&next, &total) {
                    continue;
                }
            }
            return Ok(Some((total, self.path.extend(next))));
        }
        Ok(None)
    }
}

/// Lazy sequence of solutions in non-decreasing cost order.
///
/// Each call to `next` resumes the search until the next solution, the
/// iteration cap, or exhaustion. Once it returns `None` or an error it stays
/// finished. Dropping it stops the frontier.
pub struct Solutions<C, N> {
    frontier: Box<dyn LazyFrontier<C, Path<N>>>,
    expander: Arc<Expander<C, N>>,
    is_solution: Box<dyn FnMut(&N) -> bool>,
    max_iterations: Option<u64>,
    iterations: u64,
    termination: Option<Termination>,
}

impl<C, N> Solutions<C, N>
where
    C: PartialOrd,
    N: Eq + Hash,
{
    /// Frontier pops performed so far.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Why the search finished, or `None` while it can still make progress.
    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Frontier counters so far.
    #[must_use]
    pub fn frontier_stats(&self) -> FrontierStats {
        self.frontier.stats()
    }

    /// Number of states with a recorded best cost (0 when memoization is off).
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.expander.memo.as_ref().map_or(0, |memo| {
            memo.lock().unwrap_or_else(PoisonError::into_inner).len()
        })
    }

    fn finish(&mut self, termination: Termination) {
        self.frontier.stop();
        self.termination = Some(termination);
        let stats = self.frontier.stats();
        debug!(
            ?termination,
            iterations = self.iterations,
            pushed = stats.pushed,
            popped = stats.popped,
            high_water = stats.high_water,
            "search finished"
        );
    }
}

impl<C, N> Iterator for Solutions<C, N>
where
    C: PartialOrd + Clone + Send + 'static,
    N: Eq + Hash + Clone + Send + Sync + 'static,
{
    type Item = Result<Solution<C, N>, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.termination.is_some() {
            return None;
        }
        loop {
            if self
                .max_iterations
                .is_some_and(|max| self.iterations >= max)
            {
                self.finish(Termination::IterationCap);
                return None;
            }

            let (cost, path) = match self.frontier.pop() {
                Ok(Some(item)) => item,
                Ok(None) => {
                    self.finish(Termination::Exhausted);
                    return None;
                }
                Err(err) => {
                    self.finish(Termination::Failed);
                    return Some(Err(err));
                }
            };
            let iteration = self.iterations;
            self.iterations += 1;

            if (self.is_solution)(path.last()) {
                trace!(iteration, path_len = path.len(), "solution found");
                return Some(Ok(Solution {
                    cost,
                    iteration,
                    path: path.to_vec(),
                }));
            }

            let expansion = Expansion {
                expander: Arc::clone(&self.expander),
                cost,
                path,
                neighbors: None,
            };
            if let Err(err) = self.frontier.push(Cursor::new(expansion)) {
                self.finish(Termination::Failed);
                return Some(Err(err));
            }
        }
    }
}

impl<C, N> Drop for Solutions<C, N> {
    fn drop(&mut self) {
        self.frontier.stop();
    }
}

/// Run best-first search as a minimization problem.
///
/// - `get_sorted_neighbors(n)` must yield `(incremental cost, next state)`
///   pairs in non-decreasing cost order. This is not checked; violating it
///   silently breaks the ordering of the results.
/// - `cost_add` combines an accumulated cost with an incremental one.
/// - `is_solution` is evaluated once per popped state.
///
/// Returns a lazy iterator of solutions in non-decreasing cost order. Taking
/// only the first item gives the cheapest solution; an empty iterator means
/// no solution exists (within the iteration cap).
///
/// # Errors
///
/// Returns [`SearchError::InvalidPolicy`] for an invalid policy and
/// [`SearchError::WorkerSpawn`] if the worker pool cannot be started.
/// Producer failures are reported through the iterator.
pub fn best_first_search<C, N, P, S, G, A>(
    initial_cost: C,
    initial_node: N,
    get_sorted_neighbors: P,
    is_solution: G,
    cost_add: A,
    policy: &SearchPolicy,
) -> Result<Solutions<C, N>, SearchError>
where
    C: PartialOrd + Clone + Send + 'static,
    N: Eq + Hash + Clone + Send + Sync + 'static,
    P: Fn(&N) -> S + Send + Sync + 'static,
    S: SortedSequence<C, N> + 'static,
    G: FnMut(&N) -> bool + 'static,
    A: Fn(&C, &C) -> C + Send + Sync + 'static,
{
    policy.validate()?;
    debug!(
        memoize_bound = policy.memoize_bound,
        max_iterations = ?policy.max_iterations,
        worker_count = policy.worker_count,
        "search started"
    );

    // The initial state is known at its initial cost before anything is pushed.
    let memo = policy.memoize_bound.then(|| {
        let mut memo = CostMemo::new();
        memo.admit(&initial_node, &initial_cost);
        Mutex::new(memo)
    });
    let expander = Expander {
        neighbors: Box::new(move |node: &N| Cursor::new(get_sorted_neighbors(node))),
        cost_add: Box::new(cost_add),
        memo,
    };

    let mut frontier = new_frontier(policy.worker_count)?;
    frontier.push(Cursor::once(initial_cost, Path::root(initial_node)))?;

    Ok(Solutions {
        frontier,
        expander: Arc::new(expander),
        is_solution: Box::new(is_solution),
        max_iterations: policy.max_iterations,
        iterations: 0,
        termination: None,
    })
}

/// Run [`best_first_search`] and return only the cheapest solution.
///
/// # Errors
///
/// Returns the pre-flight error of [`best_first_search`], or the producer
/// error that ended the search.
pub fn first_solution<C, N, P, S, G, A>(
    initial_cost: C,
    initial_node: N,
    get_sorted_neighbors: P,
    is_solution: G,
    cost_add: A,
    policy: &SearchPolicy,
) -> Result<Option<Solution<C, N>>, SearchError>
where
    C: PartialOrd + Clone + Send + 'static,
    N: Eq + Hash + Clone + Send + Sync + 'static,
    P: Fn(&N) -> S + Send + Sync + 'static,
    S: SortedSequence<C, N> + 'static,
    G: FnMut(&N) -> bool + 'static,
    A: Fn(&C, &C) -> C + Send + Sync + 'static,
{
    best_first_search(
        initial_cost,
        initial_node,
        get_sorted_neighbors,
        is_solution,
        cost_add,
        policy,
    )?
    .next()
    .transpose()
}
