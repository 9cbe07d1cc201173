//! # Single-assignment outcome slot.
//!
//! [`OutcomeSlot`] holds the one pending-or-resolved outcome that every
//! awaiter of an attempt lineage observes. It is a resolve-once cell layered
//! over [`tokio::sync::watch`]: the first resolution wins, later resolutions
//! are ignored, and every waiter, registered before or after resolution,
//! receives a clone of the same value.
//!
//! ## Rules
//! - Resolution is **single-assignment**: once resolved (success, failure,
//!   or cancellation) the slot never changes again. A restart allocates a
//!   new slot instead of mutating this one.
//! - Waiting is **broadcast-on-resolve**: any number of waiters may register
//!   concurrently and all observe the identical outcome.
//! - Status predicates are non-blocking snapshot reads.

use tokio::sync::watch;

use crate::error::JobError;

/// Terminal outcome of one attempt lineage.
pub(crate) type Outcome<T> = Result<T, JobError>;

/// Resolve-once outcome cell shared by all awaiters of one attempt lineage.
#[derive(Debug)]
pub(crate) struct OutcomeSlot<T> {
    tx: watch::Sender<Option<Outcome<T>>>,
}

impl<T> OutcomeSlot<T> {
    /// Creates an unresolved slot.
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// True once a terminal outcome has been written.
    pub(crate) fn is_resolved(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// True if the terminal outcome is a cancellation.
    pub(crate) fn is_canceled(&self) -> bool {
        matches!(&*self.tx.borrow(), Some(Err(err)) if err.is_canceled())
    }
}

impl<T: Clone> OutcomeSlot<T> {
    /// Writes the terminal outcome. The first write wins; returns `false`
    /// when the slot was already resolved and the outcome was dropped.
    pub(crate) fn resolve(&self, outcome: Outcome<T>) -> bool {
        self.tx.send_if_modified(move |state| {
            if state.is_some() {
                return false;
            }
            *state = Some(outcome);
            true
        })
    }

    /// Waits until the slot resolves and returns a clone of the outcome.
    ///
    /// Waiters registered after resolution return immediately.
    pub(crate) async fn wait(&self) -> Outcome<T> {
        let mut rx = self.tx.subscribe();
        loop {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return outcome;
            }
            if rx.changed().await.is_err() {
                // Sender gone without a resolution; the job was dropped.
                return Err(JobError::Canceled);
            }
        }
    }
}
