//! Lazy, single-pass sorted sequences.
//!
//! A sorted sequence yields `(cost, value)` pairs in non-decreasing cost
//! order. Producing the next pair may be arbitrarily expensive, so nothing is
//! pulled until the frontier asks for it.
//!
//! The ascending order is a caller precondition. It is not checked at runtime
//! (that would require buffering); a misordered sequence silently breaks the
//! non-decreasing output of every frontier it is pushed into.

use crate::error::SearchError;

/// A lazily evaluated, ascending-by-cost stream of `(cost, value)` pairs.
///
/// `Ok(None)` means the sequence is exhausted. Implementations are not
/// required to stay exhausted; [`Cursor`] enforces that.
pub trait SortedSequence<C, V>: Send {
    /// Produce the next pair, or `Ok(None)` when exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Producer`] when the underlying producer fails.
    fn next_pair(&mut self) -> Result<Option<(C, V)>, SearchError>;

    /// Produce the next pair during a frontier pull.
    ///
    /// Sequences that update state shared with other sequences override this
    /// and call [`PullTurn::wait`] before the update. The default ignores the
    /// turn.
    ///
    /// # Errors
    ///
    /// As [`SortedSequence::next_pair`], plus any error from `turn`.
    fn next_pair_in_turn(
        &mut self,
        _turn: &mut dyn PullTurn,
    ) -> Result<Option<(C, V)>, SearchError> {
        self.next_pair()
    }
}

/// Issue-order gate handed to each frontier pull.
///
/// Pulls are numbered as they are issued (the re-advance of a popped entry,
/// then whatever is pushed next). `wait` returns once every pull issued
/// earlier has finished, so updates made after it land in issue order on
/// every frontier variant.
pub trait PullTurn {
    /// Block until all earlier pulls have finished. Repeated calls within one
    /// pull return immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::FrontierStopped`] if the frontier stops while
    /// waiting.
    fn wait(&mut self) -> Result<(), SearchError>;
}

/// Turn for pulls that already run one at a time in issue order.
#[derive(Debug, Clone, Copy, Default)]
pub struct InOrder;

impl PullTurn for InOrder {
    fn wait(&mut self) -> Result<(), SearchError> {
        Ok(())
    }
}

impl<C, V, I> SortedSequence<C, V> for I
where
    I: Iterator<Item = (C, V)> + Send,
{
    fn next_pair(&mut self) -> Result<Option<(C, V)>, SearchError> {
        Ok(self.next())
    }
}

/// Adapter for producers whose items can fail.
///
/// The first `Err` item is reported as [`SearchError::Producer`].
#[derive(Debug)]
pub struct Fallible<I>(I);

impl<I> Fallible<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(items: T) -> Self {
        Self(items.into_iter())
    }
}

impl<C, V, E, I> SortedSequence<C, V> for Fallible<I>
where
    I: Iterator<Item = Result<(C, V), E>> + Send,
    E: std::error::Error + Send + Sync + 'static,
{
    fn next_pair(&mut self) -> Result<Option<(C, V)>, SearchError> {
        self.0.next().transpose().map_err(SearchError::producer)
    }
}

/// Single-pass cursor over a boxed sorted sequence.
///
/// Exhaustion is terminal: once the inner sequence returns `None` or an
/// error, it is dropped and every later [`Cursor::pull`] returns `Ok(None)`.
pub struct Cursor<C, V> {
    inner: Option<Box<dyn SortedSequence<C, V>>>,
}

impl<C, V> Cursor<C, V> {
    /// Wrap a sorted sequence.
    pub fn new<S>(sequence: S) -> Self
    where
        S: SortedSequence<C, V> + 'static,
    {
        Self {
            inner: Some(Box::new(sequence)),
        }
    }

    /// A cursor over exactly one pair.
    pub fn once(cost: C, value: V) -> Self
    where
        C: Send + 'static,
        V: Send + 'static,
    {
        Self::new(std::iter::once((cost, value)))
    }

    /// Pull the next pair.
    ///
    /// # Errors
    ///
    /// Propagates the producer's error. The cursor is exhausted afterwards.
    pub fn pull(&mut self) -> Result<Option<(C, V)>, SearchError> {
        self.pull_in_turn(&mut InOrder)
    }

    /// Pull the next pair, passing `turn` on to the sequence.
    ///
    /// # Errors
    ///
    /// Propagates the producer's or the turn's error. The cursor is exhausted
    /// afterwards.
    pub fn pull_in_turn(
        &mut self,
        turn: &mut dyn PullTurn,
    ) -> Result<Option<(C, V)>, SearchError> {
        let Some(inner) = self.inner.as_mut() else {
            return Ok(None);
        };
        match inner.next_pair_in_turn(turn) {
            Ok(Some(pair)) => Ok(Some(pair)),
            Ok(None) => {
                self.inner = None;
                Ok(None)
            }
            Err(err) => {
                self.inner = None;
                Err(err)
            }
        }
    }

    /// Whether the cursor has been exhausted.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.inner.is_none()
    }
}

impl<C, V> std::fmt::Debug for Cursor<C, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}
