//! # Run a single execution attempt.
//!
//! Executes one attempt of a [`Worker`](crate::Worker), interprets
//! success/failure/restart, invokes the lifecycle hooks, and resolves the
//! shared [`OutcomeSlot`](super::slot::OutcomeSlot), or deliberately leaves
//! it for a replacement attempt.
//!
//! ## Outcome flow
//! ```text
//! can_execute() == false:
//!   on_invalidated → resolve Canceled                  (no on_completed)
//!
//! execute() → Ok(v):
//!   on_completed(Ok) → restart pending? leave slot : resolve Ok(v)
//!
//! execute() → Err(e), restart pending:
//!   on_invalidated only                                (restart abort)
//!
//! execute() → Err(e), no restart:
//!   on_completed(Err) → on_invalidated → resolve Err(e)
//! ```
//!
//! ## Rules
//! - Exactly one terminal outcome is written per attempt lineage; a
//!   restart-aborted attempt writes **nothing** and its awaiters observe the
//!   replacement's outcome instead.
//! - Hook panics are contained, reported as [`EventKind::HookPanicked`], and
//!   never replace the outcome that triggered them.
//! - Cancellation is cooperative: the worker observes the token at its own
//!   yield points; nothing here preempts it.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::events::EventKind;
use crate::job::shared::JobCore;
use crate::job::slot::{Outcome, OutcomeSlot};

/// Executes one attempt and resolves `slot` unless displaced by a restart.
pub(super) async fn run_attempt<T>(
    core: Arc<JobCore<T>>,
    slot: Arc<OutcomeSlot<T>>,
    token: CancellationToken,
    attempt: u64,
) where
    T: Clone + Send + Sync + 'static,
{
    core.publish(core.event(EventKind::JobStarting).with_attempt(attempt));

    if !core.worker.can_execute() {
        invoke_invalidated(&core);
        core.publish(
            core.event(EventKind::JobCanceled)
                .with_attempt(attempt)
                .with_reason("worker not executable"),
        );
        slot.resolve(Err(JobError::Canceled));
        return;
    }

    let started = Instant::now();
    match core.worker.execute(token).await {
        Ok(value) => {
            invoke_completed(&core, &Ok(value.clone()));
            if core.restart_requested.load(Ordering::SeqCst) {
                // Displaced after finishing; the replacement resolves the slot.
                core.publish(
                    core.event(EventKind::AttemptDiscarded)
                        .with_attempt(attempt)
                        .with_elapsed(started.elapsed()),
                );
                return;
            }
            core.publish(
                core.event(EventKind::JobCompleted)
                    .with_attempt(attempt)
                    .with_elapsed(started.elapsed()),
            );
            slot.resolve(Ok(value));
        }
        Err(err) => {
            if core.restart_requested.load(Ordering::SeqCst) {
                // Aborted for restart, not a genuine failure.
                invoke_invalidated(&core);
                core.publish(
                    core.event(EventKind::AttemptDiscarded)
                        .with_attempt(attempt)
                        .with_elapsed(started.elapsed())
                        .with_reason(err.as_message()),
                );
                return;
            }
            invoke_completed(&core, &Err(err.clone()));
            invoke_invalidated(&core);
            let kind = if err.is_canceled() {
                EventKind::JobCanceled
            } else {
                EventKind::JobFailed
            };
            core.publish(
                core.event(kind)
                    .with_attempt(attempt)
                    .with_elapsed(started.elapsed())
                    .with_reason(err.as_message()),
            );
            slot.resolve(Err(err));
        }
    }
}

/// Runs `on_completed`, containing any panic.
fn invoke_completed<T>(core: &Arc<JobCore<T>>, outcome: &Outcome<T>)
where
    T: Clone + Send + Sync + 'static,
{
    let hook = panic::catch_unwind(AssertUnwindSafe(|| core.worker.on_completed(outcome)));
    if let Err(payload) = hook {
        core.publish(
            core.event(EventKind::HookPanicked)
                .with_reason(panic_reason(payload.as_ref())),
        );
    }
}

/// Runs `on_invalidated`, containing any panic.
fn invoke_invalidated<T>(core: &Arc<JobCore<T>>)
where
    T: Clone + Send + Sync + 'static,
{
    let hook = panic::catch_unwind(AssertUnwindSafe(|| core.worker.on_invalidated()));
    if let Err(payload) = hook {
        core.publish(
            core.event(EventKind::HookPanicked)
                .with_reason(panic_reason(payload.as_ref())),
        );
    }
}

/// Extracts a printable message from a panic payload.
fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
