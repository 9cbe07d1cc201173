//! # Worker contract for shared jobs.
//!
//! This module defines the [`Worker`] trait: an async, cancelable unit of
//! work plus the synchronous lifecycle hooks a [`SharedJob`](crate::SharedJob)
//! invokes around each execution attempt. The common handle type is
//! [`WorkerRef`], an `Arc<dyn Worker>` suitable for sharing across callers.
//!
//! A worker receives a [`CancellationToken`] and should periodically check it
//! to stop cooperatively when the attempt is preempted or abandoned.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;

/// # Asynchronous, cancelable unit of shared work.
///
/// The job consults [`can_execute`](Worker::can_execute) before beginning a
/// *new* attempt; an already-running attempt is never aborted merely because
/// the predicate later turns false. [`execute`](Worker::execute) performs the
/// actual work and must observe its token promptly: cancellation is
/// cooperative, never preemptive.
///
/// ## Hook contract
/// - [`on_completed`](Worker::on_completed) runs exactly once per attempt
///   that reaches success or a non-restart failure. It never runs for
///   attempts discarded by a forced restart.
/// - [`on_invalidated`](Worker::on_invalidated) runs when an attempt is
///   abandoned: a forced restart displaced it, or as cleanup after a
///   non-restart failure or cancellation.
/// - Both hooks are called synchronously within the execution context. The
///   worker owns any resources it creates during `execute` and must release
///   them in these hooks. Panics inside hooks are contained and can never
///   replace the attempt outcome.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use jobcell::{JobError, Worker};
///
/// struct Fetch;
///
/// #[async_trait]
/// impl Worker for Fetch {
///     type Output = String;
///
///     fn label(&self) -> Option<&str> { Some("fetch") }
///
///     async fn execute(&self, ctx: CancellationToken) -> Result<String, JobError> {
///         if ctx.is_cancelled() {
///             return Err(JobError::Canceled);
///         }
///         // do work...
///         Ok("payload".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Value produced by a successful attempt; cloned to every awaiter.
    type Output: Clone + Send + Sync + 'static;

    /// Optional stable, human-readable label for diagnostics.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Advisory predicate: may a new attempt begin right now?
    ///
    /// Evaluated synchronously before dispatch; may change between calls
    /// (e.g. reflect live resource state). Defaults to `true`.
    fn can_execute(&self) -> bool {
        true
    }

    /// Executes the work until completion or cancellation.
    ///
    /// Implementations should check `ctx.is_cancelled()` at their yield
    /// points and return [`JobError::Canceled`] promptly when preempted.
    async fn execute(&self, ctx: CancellationToken) -> Result<Self::Output, JobError>;

    /// Called once the attempt reached success or a non-restart failure.
    fn on_completed(&self, _outcome: &Result<Self::Output, JobError>) {}

    /// Called when the attempt is abandoned (restart, failure, cancellation).
    fn on_invalidated(&self) {}
}

/// Shared handle to a worker producing `T`.
pub type WorkerRef<T> = std::sync::Arc<dyn Worker<Output = T>>;
