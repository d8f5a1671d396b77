//! Lazy best-first frontier over sorted sequences.
//!
//! Entries in the heap are not finished items but sorted sequences: only the
//! current head of each pushed sequence occupies heap space. Popping an entry
//! returns its head and re-inserts the rest of the sequence keyed by its next
//! pair.
//!
//! Two interchangeable variants implement [`LazyFrontier`]:
//! [`SequentialFrontier`] advances sequences on the caller's thread,
//! [`crate::concurrent::ConcurrentFrontier`] offloads advancement to a worker
//! pool. Use [`new_frontier`] to pick one by worker count.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::concurrent::ConcurrentFrontier;
use crate::error::SearchError;
use crate::sequence::Cursor;

/// Compare two costs.
///
/// A value that does not compare equal to itself (NaN) sorts after every
/// value that does, and all such values tie. This keeps the order total for
/// floats. Other incomparable pairs are treated as equal; costs are expected
/// to be totally ordered apart from NaN-like values.
pub(crate) fn cmp_cost<C: PartialOrd>(a: &C, b: &C) -> Ordering {
    if let Some(order) = a.partial_cmp(b) {
        return order;
    }
    let a_unordered = a.partial_cmp(a).is_none();
    let b_unordered = b.partial_cmp(b).is_none();
    match (a_unordered, b_unordered) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// The heap ordering key: `(cost, seq)`.
///
/// Lower cost first; equal costs are broken FIFO by the insertion sequence
/// number, which is monotonic and never reused.
#[derive(Debug, Clone)]
pub(crate) struct FrontierKey<C> {
    pub cost: C,
    pub seq: u64,
}

impl<C: PartialOrd> PartialEq for FrontierKey<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: PartialOrd> Eq for FrontierKey<C> {}

impl<C: PartialOrd> PartialOrd for FrontierKey<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: PartialOrd> Ord for FrontierKey<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_cost(&self.cost, &other.cost).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A frontier entry: the head of a sequence plus the rest of it.
///
/// `BinaryHeap` is a max-heap, so we use `Reverse<FrontierKey>` to get
/// min-heap behavior (lowest cost first).
pub(crate) struct FrontierEntry<C, V> {
    pub key: Reverse<FrontierKey<C>>,
    pub value: V,
    pub rest: Cursor<C, V>,
}

impl<C, V> FrontierEntry<C, V> {
    pub fn new(cost: C, seq: u64, value: V, rest: Cursor<C, V>) -> Self {
        Self {
            key: Reverse(FrontierKey { cost, seq }),
            value,
            rest,
        }
    }
}

impl<C: PartialOrd, V> PartialEq for FrontierEntry<C, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<C: PartialOrd, V> Eq for FrontierEntry<C, V> {}

impl<C: PartialOrd, V> PartialOrd for FrontierEntry<C, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: PartialOrd, V> Ord for FrontierEntry<C, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

/// Counters shared by both frontier variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    /// Sequences handed to `push`.
    pub pushed: u64,
    /// Items returned by `pop`.
    pub popped: u64,
    /// Largest number of entries held in the heap at once.
    pub high_water: u64,
}

impl FrontierStats {
    pub(crate) fn observe_len(&mut self, len: usize) {
        let len = len as u64;
        if len > self.high_water {
            self.high_water = len;
        }
    }
}

/// Min-heap of sorted sequences.
///
/// # Contract
///
/// - Every pushed sequence must be ascending by cost; under that
///   precondition successive `pop` calls return non-decreasing costs, with
///   equal costs returned in push order.
/// - The heap holds at most one entry per pushed sequence.
/// - `push` and `pop` are single-writer: only one caller thread may use a
///   frontier. After `stop`, further `push`/`pop` calls are unspecified.
pub trait LazyFrontier<C, V> {
    /// Add a sequence to the frontier. An already exhausted sequence is
    /// discarded silently.
    ///
    /// A producer error raised while pulling the sequence's first pair is
    /// held back and returned by the next `pop`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::FrontierStopped`] after `stop`.
    fn push(&mut self, sequence: Cursor<C, V>) -> Result<(), SearchError>;

    /// Remove and return the minimal `(cost, value)`, or `None` when empty.
    ///
    /// # Errors
    ///
    /// Returns the first producer error raised while advancing a sequence on
    /// behalf of this frontier that has not been reported yet. The failed
    /// sequence is dropped; the rest of the frontier is left intact.
    fn pop(&mut self) -> Result<Option<(C, V)>, SearchError>;

    /// Abandon outstanding background work. Idempotent.
    fn stop(&mut self);

    /// Push/pop counters and heap high-water mark.
    fn stats(&self) -> FrontierStats;
}

/// Build a frontier: sequential for `worker_count == 0`, concurrent otherwise.
///
/// # Errors
///
/// Returns [`SearchError::WorkerSpawn`] if the worker pool cannot be started.
pub fn new_frontier<C, V>(
    worker_count: usize,
) -> Result<Box<dyn LazyFrontier<C, V>>, SearchError>
where
    C: PartialOrd + Clone + Send + 'static,
    V: Send + 'static,
{
    if worker_count == 0 {
        Ok(Box::new(SequentialFrontier::new()))
    } else {
        Ok(Box::new(ConcurrentFrontier::new(worker_count)?))
    }
}

/// Frontier that advances sequences on the caller's thread.
pub struct SequentialFrontier<C, V> {
    heap: BinaryHeap<FrontierEntry<C, V>>,
    next_seq: u64,
    failure: Option<SearchError>,
    stats: FrontierStats,
}

impl<C: PartialOrd, V> SequentialFrontier<C, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
            failure: None,
            stats: FrontierStats::default(),
        }
    }

    /// Current number of heap entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn insert_next(&mut self, mut sequence: Cursor<C, V>) {
        match sequence.pull() {
            Ok(Some((cost, value))) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.heap.push(FrontierEntry::new(cost, seq, value, sequence));
                self.stats.observe_len(self.heap.len());
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "sorted producer failed");
                if self.failure.is_none() {
                    self.failure = Some(err);
                }
            }
        }
    }
}

impl<C: PartialOrd, V> Default for SequentialFrontier<C, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: PartialOrd, V> LazyFrontier<C, V> for SequentialFrontier<C, V> {
    fn push(&mut self, sequence: Cursor<C, V>) -> Result<(), SearchError> {
        self.stats.pushed += 1;
        self.insert_next(sequence);
        Ok(())
    }

    fn pop(&mut self) -> Result<Option<(C, V)>, SearchError> {
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        let Some(entry) = self.heap.pop() else {
            return Ok(None);
        };
        let Reverse(FrontierKey { cost, .. }) = entry.key;
        self.stats.popped += 1;
        self.insert_next(entry.rest);
        Ok(Some((cost, entry.value)))
    }

    fn stop(&mut self) {}

    fn stats(&self) -> FrontierStats {
        self.stats
    }
}
