//! Deterministic input builders and frontier drivers for the acceptance tests.
//!
//! Nothing here is random at runtime: every "random" list comes from a seeded
//! xorshift generator so failures reproduce exactly.

use std::thread;
use std::time::Duration;

use lazyfront_search::{Cursor, LazyFrontier, SearchError};

/// Identifies an item as `(list index, position within the list)`.
pub type Tag = (usize, usize);

/// Seeded xorshift64 generator.
pub struct XorShift(u64);

impl XorShift {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    /// Next value in `0..bound`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    pub fn below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "bound must be positive");
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x % bound
    }
}

/// `count` ascending cost lists of up to `max_len` items with costs in
/// `0..spread`. Small spreads make equal costs common.
///
/// # Panics
///
/// Panics if `spread` exceeds `u32::MAX`.
pub fn ascending_lists(rng: &mut XorShift, count: usize, max_len: u64, spread: u64) -> Vec<Vec<u32>> {
    (0..count)
        .map(|_| {
            let len = rng.below(max_len + 1);
            let mut costs: Vec<u32> = (0..len)
                .map(|_| u32::try_from(rng.below(spread)).unwrap())
                .collect();
            costs.sort_unstable();
            costs
        })
        .collect()
}

/// Tagged items of list `index`.
#[must_use]
pub fn tagged(index: usize, costs: &[u32]) -> Vec<(u32, Tag)> {
    costs
        .iter()
        .enumerate()
        .map(|(position, &cost)| (cost, (index, position)))
        .collect()
}

/// Cursor that sleeps `delay` before producing each item.
pub fn delayed<V: Send + 'static>(items: Vec<(u32, V)>, delay: Duration) -> Cursor<u32, V> {
    Cursor::new(items.into_iter().inspect(move |_| {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }))
}

/// Pop until the frontier is empty.
///
/// # Errors
///
/// Returns the first error `pop` reports.
pub fn drain<C, V>(frontier: &mut dyn LazyFrontier<C, V>) -> Result<Vec<(C, V)>, SearchError> {
    let mut out = Vec::new();
    while let Some(item) = frontier.pop()? {
        out.push(item);
    }
    Ok(out)
}

/// Assert `popped` is a valid merge of `lists`: costs non-decreasing, every
/// item exactly once, and each list's items in their original order.
///
/// # Panics
///
/// Panics when any of those properties fails.
pub fn assert_valid_merge(lists: &[Vec<u32>], popped: &[(u32, Tag)]) {
    assert!(
        popped.windows(2).all(|w| w[0].0 <= w[1].0),
        "costs must be non-decreasing: {popped:?}"
    );
    let total: usize = lists.iter().map(Vec::len).sum();
    assert_eq!(popped.len(), total, "every item popped exactly once");

    let mut next_position = vec![0usize; lists.len()];
    for &(cost, (list, position)) in popped {
        assert_eq!(position, next_position[list], "list {list} popped out of order");
        assert_eq!(cost, lists[list][position]);
        next_position[list] += 1;
    }
}
