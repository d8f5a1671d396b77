//! Typed search errors.
//!
//! `SearchError` covers both pre-flight failures (policy validation, worker
//! pool creation) returned by [`crate::search::best_first_search`] and runtime
//! failures surfaced through the solution iterator. Running out of frontier
//! or hitting the iteration cap is never an error; see
//! [`crate::search::Termination`].

/// Boxed error raised by caller-supplied producer code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Typed failure for frontier and search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The sorted producer failed while a sequence was being advanced.
    #[error("sorted producer failed: {0}")]
    Producer(#[source] BoxError),
    /// Producer code panicked on a frontier worker thread.
    #[error("frontier worker panicked while advancing a sequence")]
    WorkerPanicked,
    /// The concurrent frontier could not start its worker pool.
    #[error("failed to spawn frontier worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
    /// `push` was called after `stop`.
    #[error("frontier has been stopped")]
    FrontierStopped,
    /// The search policy is outside the supported range.
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
}

impl SearchError {
    /// Wrap any producer error.
    pub fn producer<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Producer(err.into())
    }
}
