//! Concurrent lazy frontier.
//!
//! Sequence advancement ("pull the next pair") is the only work delegated to
//! a fixed pool of worker threads. Workers report back purely by inserting
//! into the shared heap under one mutex; the caller's thread never blocks on
//! a worker except inside `pop`, and only until an in-flight pull completes.
//!
//! # Ordering
//!
//! Every in-flight pull is registered under the heap lock with the sequence
//! number reserved for it and a *floor*: the cost it cannot go below (the
//! cost of the entry it was advanced from), or no floor for freshly pushed
//! sequences. `pop` hands out the heap minimum only when no pending pull
//! could still produce an entry ordered before it, so the output matches the
//! sequential frontier for the same pushes regardless of scheduling.
//!
//! The same pending list orders side effects: a sequence that calls
//! [`PullTurn::wait`] during its pull resumes only after every pull issued
//! before it has settled. Pulls are issued in the order the sequential
//! frontier performs them, so such updates replay that order exactly.

use std::collections::{BinaryHeap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::frontier::{cmp_cost, FrontierEntry, FrontierKey, FrontierStats, LazyFrontier};
use crate::sequence::{Cursor, PullTurn};

/// A pull that has been submitted but whose result is not in the heap yet.
struct PendingPull<C> {
    seq: u64,
    floor: Option<C>,
}

/// One unit of worker work: advance `cursor` and insert its head as `seq`.
struct Job<C, V> {
    seq: u64,
    cursor: Cursor<C, V>,
}

struct State<C, V> {
    heap: BinaryHeap<FrontierEntry<C, V>>,
    next_seq: u64,
    pending: VecDeque<PendingPull<C>>,
    failure: Option<SearchError>,
    stats: FrontierStats,
}

impl<C: PartialOrd, V> State<C, V> {
    fn reserve(&mut self, floor: Option<C>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push_back(PendingPull { seq, floor });
        seq
    }

    fn settle(&mut self, seq: u64) {
        self.pending.retain(|p| p.seq != seq);
    }

    /// Whether some pending pull may still produce an entry ordered before `top`.
    fn blocked_by_pending(&self, top: &FrontierKey<C>) -> bool {
        self.pending.iter().any(|p| match &p.floor {
            None => true,
            Some(floor) => cmp_cost(floor, &top.cost)
                .then_with(|| p.seq.cmp(&top.seq))
                .is_lt(),
        })
    }
}

struct Shared<C, V> {
    state: Mutex<State<C, V>>,
    settled: Condvar,
    stopped: AtomicBool,
}

impl<C: PartialOrd, V> Shared<C, V> {
    fn lock(&self) -> MutexGuard<'_, State<C, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop a job without running it.
    fn abandon(&self, seq: u64) {
        self.lock().settle(seq);
        self.settled.notify_all();
    }

    /// Record the outcome of a pull. Results arriving after `stop` began are
    /// discarded.
    fn complete(
        &self,
        seq: u64,
        cursor: Cursor<C, V>,
        outcome: thread::Result<Result<Option<(C, V)>, SearchError>>,
    ) {
        let mut state = self.lock();
        state.settle(seq);
        let mut discarded = None;
        if self.stopped.load(Ordering::Acquire) {
            discarded = Some(cursor);
        } else {
            match outcome {
                Ok(Ok(Some((cost, value)))) => {
                    state.heap.push(FrontierEntry::new(cost, seq, value, cursor));
                    let len = state.heap.len();
                    state.stats.observe_len(len);
                }
                Ok(Ok(None)) => discarded = Some(cursor),
                Ok(Err(err)) => {
                    warn!(error = %err, "sorted producer failed on frontier worker");
                    if state.failure.is_none() {
                        state.failure = Some(err);
                    }
                    discarded = Some(cursor);
                }
                Err(_) => {
                    warn!("producer panicked on frontier worker");
                    if state.failure.is_none() {
                        state.failure = Some(SearchError::WorkerPanicked);
                    }
                    discarded = Some(cursor);
                }
            }
        }
        drop(state);
        self.settled.notify_all();
        drop(discarded);
    }
}

/// Turn of the pull running as `seq`.
///
/// Granted once no pull with a lower sequence number is pending. Jobs leave
/// the channel in sequence order, so the lowest pending pull is always held
/// by a running worker and never waits itself.
struct WorkerTurn<'a, C, V> {
    shared: &'a Shared<C, V>,
    seq: u64,
    granted: bool,
}

impl<C: PartialOrd, V> PullTurn for WorkerTurn<'_, C, V> {
    fn wait(&mut self) -> Result<(), SearchError> {
        if self.granted {
            return Ok(());
        }
        let mut state = self.shared.lock();
        loop {
            if self.shared.stopped.load(Ordering::Acquire) {
                return Err(SearchError::FrontierStopped);
            }
            if state.pending.front().map_or(true, |p| p.seq >= self.seq) {
                break;
            }
            state = self
                .shared
                .settled
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.granted = true;
        Ok(())
    }
}

fn run_worker<C: PartialOrd, V>(shared: &Arc<Shared<C, V>>, jobs: Receiver<Job<C, V>>) {
    for Job { seq, mut cursor } in jobs {
        if shared.stopped.load(Ordering::Acquire) {
            // Cancelled before it started.
            shared.abandon(seq);
            continue;
        }
        let mut turn = WorkerTurn {
            shared,
            seq,
            granted: false,
        };
        let outcome = catch_unwind(AssertUnwindSafe(|| cursor.pull_in_turn(&mut turn)));
        shared.complete(seq, cursor, outcome);
    }
}

/// Frontier whose sequence advancement runs on a fixed worker pool.
///
/// Not safe for concurrent external callers: `push`/`pop` must be driven from
/// a single thread. Dropping the frontier stops it.
pub struct ConcurrentFrontier<C, V> {
    shared: Arc<Shared<C, V>>,
    jobs: Option<Sender<Job<C, V>>>,
    workers: Vec<JoinHandle<()>>,
}

impl<C, V> ConcurrentFrontier<C, V>
where
    C: PartialOrd + Clone + Send + 'static,
    V: Send + 'static,
{
    /// Start a frontier backed by `worker_count` threads.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::WorkerSpawn`] if a worker thread cannot be
    /// spawned. Workers already started are shut down.
    pub fn new(worker_count: usize) -> Result<Self, SearchError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut frontier = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    heap: BinaryHeap::new(),
                    next_seq: 0,
                    pending: VecDeque::new(),
                    failure: None,
                    stats: FrontierStats::default(),
                }),
                settled: Condvar::new(),
                stopped: AtomicBool::new(false),
            }),
            jobs: Some(tx),
            workers: Vec::with_capacity(worker_count),
        };
        for index in 0..worker_count {
            let shared = Arc::clone(&frontier.shared);
            let jobs = rx.clone();
            let handle = thread::Builder::new()
                .name(format!("lazyfront-worker-{index}"))
                .spawn(move || run_worker(&shared, jobs))
                .map_err(SearchError::WorkerSpawn)?;
            frontier.workers.push(handle);
        }
        debug!(worker_count, "concurrent frontier started");
        Ok(frontier)
    }

    /// Number of worker threads still attached to the frontier.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of submitted pulls that have not completed yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.lock().pending.len()
    }

    fn submit(&self, seq: u64, cursor: Cursor<C, V>) -> Result<(), SearchError> {
        let sent = match &self.jobs {
            Some(jobs) => jobs.send(Job { seq, cursor }).is_ok(),
            None => false,
        };
        if sent {
            Ok(())
        } else {
            self.shared.abandon(seq);
            Err(SearchError::FrontierStopped)
        }
    }
}

impl<C, V> LazyFrontier<C, V> for ConcurrentFrontier<C, V>
where
    C: PartialOrd + Clone + Send + 'static,
    V: Send + 'static,
{
    fn push(&mut self, sequence: Cursor<C, V>) -> Result<(), SearchError> {
        if self.shared.stopped.load(Ordering::Acquire) {
            return Err(SearchError::FrontierStopped);
        }
        let seq = {
            let mut state = self.shared.lock();
            state.stats.pushed += 1;
            state.reserve(None)
        };
        self.submit(seq, sequence)
    }

    fn pop(&mut self) -> Result<Option<(C, V)>, SearchError> {
        let mut state = self.shared.lock();
        loop {
            if let Some(err) = state.failure.take() {
                return Err(err);
            }
            let ready = match state.heap.peek() {
                Some(top) => !state.blocked_by_pending(&top.key.0),
                None if state.pending.is_empty() => return Ok(None),
                None => false,
            };
            if ready {
                if let Some(entry) = state.heap.pop() {
                    let FrontierEntry { key, value, rest } = entry;
                    let cost = key.0.cost;
                    state.stats.popped += 1;
                    let seq = state.reserve(Some(cost.clone()));
                    drop(state);
                    self.submit(seq, rest)?;
                    return Ok(Some((cost, value)));
                }
            }
            state = self
                .shared
                .settled
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn stop(&mut self) {
        let Some(jobs) = self.jobs.take() else {
            return;
        };
        let cancelled = {
            let mut state = self.shared.lock();
            self.shared.stopped.store(true, Ordering::Release);
            let cancelled = state.pending.len();
            state.pending.clear();
            cancelled
        };
        drop(jobs);
        self.shared.settled.notify_all();
        let workers = self.workers.len();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("frontier worker exited by panic");
            }
        }
        debug!(workers, cancelled, "concurrent frontier stopped");
    }

    fn stats(&self) -> FrontierStats {
        self.shared.lock().stats
    }
}

impl<C, V> Drop for ConcurrentFrontier<C, V> {
    fn drop(&mut self) {
        // Same as `stop`, without the trait bounds.
        if self.jobs.take().is_none() {
            return;
        }
        {
            let _state = self
                .shared
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.shared.stopped.store(true, Ordering::Release);
        }
        // Wake workers blocked on their turn.
        self.shared.settled.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
