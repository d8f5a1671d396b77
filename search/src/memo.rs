//! Best-known cost per state, used for dominance pruning.

use std::collections::HashMap;
use std::hash::Hash;

/// Mapping from state to the best accumulated cost seen so far.
///
/// Entries are only ever lowered, never removed, for the lifetime of one
/// search invocation.
#[derive(Debug)]
pub struct CostMemo<N, C> {
    best: HashMap<N, C>,
}

impl<N, C> CostMemo<N, C>
where
    N: Eq + Hash,
    C: PartialOrd,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            best: HashMap::new(),
        }
    }

    /// Record `total` for `node` unless an equal or cheaper cost is known.
    ///
    /// Returns `true` when the candidate was admitted (and recorded).
    pub fn admit(&mut self, node: &N, total: &C) -> bool
    where
        N: Clone,
        C: Clone,
    {
        match self.best.get_mut(node) {
            Some(known) if *known <= *total => false,
            Some(known) => {
                *known = total.clone();
                true
            }
            None => {
                self.best.insert(node.clone(), total.clone());
                true
            }
        }
    }

    /// Best cost recorded for `node`, if any.
    #[must_use]
    pub fn best(&self, node: &N) -> Option<&C> {
        self.best.get(node)
    }

    /// Number of states with a recorded cost.
    #[must_use]
    pub fn len(&self) -> usize {
        self.best.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

impl<N, C> Default for CostMemo<N, C>
where
    N: Eq + Hash,
    C: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}
