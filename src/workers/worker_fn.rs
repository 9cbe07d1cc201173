//! # Function-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a
//! fresh future per attempt. This avoids shared mutable state between
//! attempts: every restart runs a brand-new future that owns its own state.
//! If attempts need common state, capture an `Arc<...>` explicitly inside the
//! closure.
//!
//! Hooks and `can_execute` keep their defaults; implement [`Worker`] directly
//! when the lifecycle hooks matter.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use jobcell::{JobError, WorkerFn, WorkerRef};
//!
//! let w: WorkerRef<u32> = WorkerFn::arc("answer", |ctx: CancellationToken| async move {
//!     if ctx.is_cancelled() {
//!         return Err(JobError::Canceled);
//!     }
//!     Ok::<_, JobError>(42)
//! });
//!
//! assert_eq!(w.label(), Some("answer"));
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::workers::worker::Worker;

/// Function-backed worker implementation.
///
/// Wraps a closure that *creates* a new future per attempt.
#[derive(Debug)]
pub struct WorkerFn<F> {
    label: Cow<'static, str>,
    f: F,
}

impl<F> WorkerFn<F> {
    /// Creates a new function-backed worker.
    ///
    /// Prefer [`WorkerFn::arc`] when you immediately need a [`WorkerRef`](crate::WorkerRef).
    pub fn new(label: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            label: label.into(),
            f,
        }
    }

    /// Creates the worker and returns it as a shared handle (`Arc<dyn Worker>`).
    ///
    /// ## Example
    /// ```rust
    /// use tokio_util::sync::CancellationToken;
    /// use jobcell::{JobError, WorkerFn, WorkerRef};
    ///
    /// let w: WorkerRef<()> = WorkerFn::arc("noop", |_ctx: CancellationToken| async {
    ///     Ok::<_, JobError>(())
    /// });
    /// assert_eq!(w.label(), Some("noop"));
    /// ```
    pub fn arc(label: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(label, f))
    }
}

#[async_trait]
impl<F, Fut, T> Worker for WorkerFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<T, JobError>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    type Output = T;

    fn label(&self) -> Option<&str> {
        Some(&self.label)
    }

    async fn execute(&self, ctx: CancellationToken) -> Result<T, JobError> {
        (self.f)(ctx).await
    }
}
