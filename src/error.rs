//! Error type surfaced to job awaiters.
//!
//! A [`SharedJob`](crate::SharedJob) terminates every attempt with exactly one
//! outcome, and that outcome is fanned out to all awaiters. [`JobError`] is the
//! failure half of it:
//!
//! - [`JobError::Fail`]: the worker's `execute` raised a genuine error.
//! - [`JobError::Canceled`]: the attempt ended without producing a value:
//!   the worker was not executable, every awaiter lost interest, or
//!   [`cancel_all`](crate::SharedJob::cancel_all) was called.
//!
//! The type is `Clone` so one resolution can be delivered to any number of
//! concurrent awaiters. Helper methods (`as_label`, `as_message`) provide
//! short stable strings for logs/metrics.

use thiserror::Error;

/// # Errors produced by job execution.
///
/// Surfaced from [`SharedJob::start`](crate::SharedJob::start); every awaiter
/// bound to the same attempt observes an identical value.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum JobError {
    /// Worker execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The attempt was cancelled before producing a value.
    #[error("job canceled")]
    Canceled,
}

impl JobError {
    /// Wraps an arbitrary error message into [`JobError::Fail`].
    ///
    /// # Example
    /// ```
    /// use jobcell::JobError;
    ///
    /// let err = JobError::fail("connection refused");
    /// assert_eq!(err.as_label(), "job_failed");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        JobError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use jobcell::JobError;
    ///
    /// assert_eq!(JobError::Canceled.as_label(), "job_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Fail { .. } => "job_failed",
            JobError::Canceled => "job_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            JobError::Fail { error } => format!("error: {error}"),
            JobError::Canceled => "canceled".to_string(),
        }
    }

    /// True if this outcome is a cancellation rather than a genuine failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, JobError::Canceled)
    }
}
