//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [starting] job=refresh#3 attempt=1
//! [completed] job=refresh#3 attempt=1 elapsed=102ms
//! [failed] job=refresh#3 attempt=2 reason="error: boom"
//! [canceled] job=refresh#3 attempt=1
//! [restart-requested] job=refresh#3
//! [discarded] job=refresh#3 attempt=1
//! [cancel-requested] job=refresh#3
//! [awaiters-gone] job=refresh#3
//! [hook-panicked] job=refresh#3 reason="cleanup failed"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

impl LogWriter {
    fn ident(e: &Event) -> String {
        match (&e.job, e.serial) {
            (Some(job), Some(serial)) => format!("{job}#{serial}"),
            (Some(job), None) => job.to_string(),
            (None, Some(serial)) => format!("#{serial}"),
            (None, None) => "?".to_string(),
        }
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let ident = Self::ident(e);
        match e.kind {
            EventKind::JobStarting => {
                println!("[starting] job={ident} attempt={:?}", e.attempt);
            }
            EventKind::JobCompleted => {
                println!(
                    "[completed] job={ident} attempt={:?} elapsed={:?}",
                    e.attempt, e.elapsed
                );
            }
            EventKind::JobFailed => {
                println!(
                    "[failed] job={ident} attempt={:?} reason={:?}",
                    e.attempt, e.reason
                );
            }
            EventKind::JobCanceled => {
                println!("[canceled] job={ident} attempt={:?}", e.attempt);
            }
            EventKind::RestartRequested => {
                println!("[restart-requested] job={ident}");
            }
            EventKind::AttemptDiscarded => {
                println!("[discarded] job={ident} attempt={:?}", e.attempt);
            }
            EventKind::CancelRequested => {
                println!("[cancel-requested] job={ident}");
            }
            EventKind::AwaitersGone => {
                println!("[awaiters-gone] job={ident}");
            }
            EventKind::HookPanicked => {
                println!("[hook-panicked] job={ident} reason={:?}", e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
