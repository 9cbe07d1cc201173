//! # Diagnostic events emitted by shared jobs.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Attempt lifecycle**: execution flow (starting, completed, failed, canceled).
//! - **Coordination**: restart and cancellation bookkeeping (restart requested,
//!   attempt discarded, administrative cancel, all awaiters gone).
//! - **Isolation**: a worker hook panicked and was contained.
//!
//! The [`Event`] struct carries optional metadata such as the job label, its
//! process-wide serial id, the attempt number, elapsed wall time, and a
//! human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use jobcell::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::JobFailed)
//!     .with_job("refresh-token")
//!     .with_serial(7)
//!     .with_attempt(3)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::JobFailed);
//! assert_eq!(ev.job.as_deref(), Some("refresh-token"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Attempt lifecycle events ===
    /// An execution attempt is starting.
    ///
    /// Sets:
    /// - `job`: worker label (if any)
    /// - `serial`: job serial id
    /// - `attempt`: attempt number (1-based, per job)
    JobStarting,

    /// An attempt finished successfully and resolved the outcome slot.
    ///
    /// Sets: `job`, `serial`, `attempt`, `elapsed`.
    JobCompleted,

    /// An attempt failed with a genuine worker error.
    ///
    /// Sets: `job`, `serial`, `attempt`, `elapsed`, `reason`.
    JobFailed,

    /// An attempt resolved as cancelled: the worker was not executable,
    /// the last awaiter left, or an administrative cancel arrived.
    ///
    /// Sets: `job`, `serial`, `attempt`, `reason`; `elapsed` when work ran.
    JobCanceled,

    // === Coordination events ===
    /// A forced restart preempted the in-flight attempt.
    ///
    /// Sets: `job`, `serial`.
    RestartRequested,

    /// An attempt was discarded because a restart displaced it; no outcome
    /// was written on its behalf.
    ///
    /// Sets: `job`, `serial`, `attempt`; `reason` when it unwound with an error.
    AttemptDiscarded,

    /// Administrative cancellation: the slot was resolved as cancelled for
    /// every current and future awaiter.
    ///
    /// Sets: `job`, `serial`.
    CancelRequested,

    /// The last awaiter disengaged while the outcome was unresolved; the
    /// in-flight attempt is being cancelled as orphaned.
    ///
    /// Sets: `job`, `serial`.
    AwaitersGone,

    // === Isolation events ===
    /// A worker hook (`on_completed`/`on_invalidated`) panicked. The panic
    /// was contained and the attempt outcome is unaffected.
    ///
    /// Sets: `job`, `serial`, `reason`.
    HookPanicked,
}

/// Diagnostic event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Worker label, if the worker provides one.
    pub job: Option<Arc<str>>,
    /// Process-wide serial id of the job instance.
    pub serial: Option<u64>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u64>,
    /// Wall time the attempt spent executing.
    pub elapsed: Option<Duration>,
    /// Human-readable reason (errors, panic payloads, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            job: None,
            serial: None,
            attempt: None,
            elapsed: None,
            reason: None,
        }
    }

    /// Attaches a job label.
    #[inline]
    pub fn with_job(mut self, job: impl Into<Arc<str>>) -> Self {
        self.job = Some(job.into());
        self
    }

    /// Attaches the job's serial id.
    #[inline]
    pub fn with_serial(mut self, serial: u64) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, attempt: u64) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Attaches elapsed execution time.
    #[inline]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
