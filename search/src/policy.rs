//! Search policy types.

use crate::error::SearchError;

/// Upper bound on the concurrent frontier's worker pool.
pub const MAX_WORKERS: usize = 1024;

/// Pruning, iteration budget and frontier selection for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Prune candidates whose state already has an equal or cheaper known
    /// cost. Turn off when the state space is a tree to save memory.
    pub memoize_bound: bool,
    /// Hard cap on frontier pops. `None` searches until exhaustion.
    pub max_iterations: Option<u64>,
    /// `0` runs the frontier on the caller's thread; `n > 0` advances
    /// sequences on `n` worker threads.
    pub worker_count: usize,
}

impl SearchPolicy {
    #[must_use]
    pub fn with_memoize_bound(mut self, memoize_bound: bool) -> Self {
        self.memoize_bound = memoize_bound;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    #[must_use]
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Validate the policy before any search work starts.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `worker_count` exceeds
    /// [`MAX_WORKERS`].
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.worker_count > MAX_WORKERS {
            return Err(SearchError::InvalidPolicy {
                detail: format!(
                    "worker_count {} exceeds the maximum of {MAX_WORKERS}",
                    self.worker_count
                ),
            });
        }
        Ok(())
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            memoize_bound: true,
            max_iterations: None,
            worker_count: 0,
        }
    }
}
