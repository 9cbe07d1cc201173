//! # SharedJob: deduplicated, restartable shared execution.
//!
//! [`SharedJob`] wraps one unit of asynchronous work so that, while the work
//! is in flight, any number of independent callers can request it and all
//! receive the *same* outcome without re-triggering the work. Callers may
//! force a restart that invalidates an in-flight attempt without surfacing a
//! spurious failure to anyone still waiting.
//!
//! ## Architecture
//! ```text
//! caller A ──┐
//! caller B ──┼─► start(options)
//! caller C ──┘        │
//!                     ▼
//!          ┌─────────────────────────┐   decision lock (async mutex)
//!          │ decide: join / restart /│   held only for the transition,
//!          │ force-restart / dispatch│   never across the work itself
//!          └───────────┬─────────────┘
//!                      ▼
//!            spawn run_attempt(..)  ──►  OutcomeSlot (resolve once)
//!                      ▲                      │
//!            CancellationToken                ▼
//!         (restart / orphan / admin)   all awaiters .wait()
//! ```
//!
//! ## Rules
//! - At most **one** execution attempt runs per job at any time.
//! - A resolved slot is never mutated; a later `start` either returns it or
//!   allocates a brand-new slot.
//! - `ForceRestart` preempts only *unresolved* attempts, and keeps existing
//!   awaiters bound to the slot the replacement attempt resolves.
//! - When the awaiter count drops to zero with the outcome unresolved, the
//!   in-flight attempt is cancelled as orphaned; the zero check is repeated
//!   under the decision lock before cancelling.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::events::{Bus, Event, EventKind};
use crate::job::options::{StartMode, StartOptions};
use crate::job::slot::OutcomeSlot;
use crate::job::supervisor::run_attempt;
use crate::workers::WorkerRef;

/// Process-wide serial counter; purely diagnostic, never reset.
static JOB_SERIAL: AtomicU64 = AtomicU64::new(0);

/// In-flight execution attempt: its cancellation token and spawned task.
pub(super) struct Attempt {
    pub(super) token: CancellationToken,
    pub(super) join: JoinHandle<()>,
}

/// Dispatch bookkeeping guarded by the decision lock.
pub(super) struct Dispatch {
    pub(super) attempt: Option<Attempt>,
}

/// Shared state behind a [`SharedJob`] handle.
pub(super) struct JobCore<T: Clone + Send + Sync + 'static> {
    pub(super) worker: WorkerRef<T>,
    pub(super) serial: u64,
    pub(super) bus: Bus,
    /// Serializes start/restart/cancel decisions. Held only for the
    /// transition; the single in-lock suspension point is awaiting the
    /// unwind of a preempted attempt.
    decision: Mutex<Dispatch>,
    /// Current outcome slot; read lock-free-ish by the status predicates.
    slot: StdMutex<Option<Arc<OutcomeSlot<T>>>>,
    /// Set when a forced restart preempts the in-flight attempt; cleared at
    /// dispatch of the replacement. The preempted attempt reads it to tell
    /// "cancelled for restart" apart from "everyone left".
    pub(super) restart_requested: AtomicBool,
    /// Callers currently blocked inside `start`.
    awaiters: AtomicUsize,
    /// Attempt counter, diagnostics only.
    attempts: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> JobCore<T> {
    /// Builds an event pre-populated with this job's identity.
    pub(super) fn event(&self, kind: EventKind) -> Event {
        let ev = Event::new(kind).with_serial(self.serial);
        match self.worker.label() {
            Some(label) => ev.with_job(label),
            None => ev,
        }
    }

    /// Publishes a diagnostic event; failures of the sink are invisible.
    pub(super) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }

    fn current_slot(&self) -> Option<Arc<OutcomeSlot<T>>> {
        self.slot.lock().expect("slot register poisoned").clone()
    }

    fn install_slot(&self, slot: &Arc<OutcomeSlot<T>>) {
        *self.slot.lock().expect("slot register poisoned") = Some(Arc::clone(slot));
    }

    /// Allocates a fresh slot and launches an attempt that resolves it.
    fn dispatch_fresh(core: &Arc<Self>, dispatch: &mut Dispatch) -> Arc<OutcomeSlot<T>> {
        let slot = Arc::new(OutcomeSlot::new());
        core.install_slot(&slot);
        Self::dispatch_onto(core, dispatch, Arc::clone(&slot));
        slot
    }

    /// Launches an attempt that resolves `slot`. Clears `restart_requested`
    /// while still under the decision lock, so a later forced restart can
    /// never lose its flag to the attempt it is preempting.
    fn dispatch_onto(core: &Arc<Self>, dispatch: &mut Dispatch, slot: Arc<OutcomeSlot<T>>) {
        core.restart_requested.store(false, Ordering::SeqCst);
        let token = CancellationToken::new();
        let attempt = core.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let join = tokio::spawn(run_attempt(Arc::clone(core), slot, token.clone(), attempt));
        dispatch.attempt = Some(Attempt { token, join });
    }

    /// The decision step of `start`: returns the slot this caller awaits,
    /// with the awaiter count already incremented on its behalf.
    async fn decide(core: &Arc<Self>, mode: StartMode) -> Arc<OutcomeSlot<T>> {
        let mut dispatch = core.decision.lock().await;

        let slot = match (core.current_slot(), mode) {
            (None, _) => Self::dispatch_fresh(core, &mut dispatch),

            (Some(slot), StartMode::ForceRestart) => {
                if slot.is_resolved() {
                    // Forced restart never restarts a completed job.
                    slot
                } else {
                    core.restart_requested.store(true, Ordering::SeqCst);
                    core.publish(core.event(EventKind::RestartRequested));
                    if let Some(active) = dispatch.attempt.take() {
                        let mut takeover = TakeoverGuard {
                            core: Arc::clone(core),
                            slot: Arc::clone(&slot),
                            armed: true,
                        };
                        active.token.cancel();
                        // Bounded by the attempt's cooperative cancellation
                        // latency; the only in-lock suspension point.
                        let _ = active.join.await;
                        takeover.armed = false;
                    }
                    if slot.is_resolved() {
                        // The attempt finished before it saw the flag.
                        core.restart_requested.store(false, Ordering::SeqCst);
                        slot
                    } else {
                        // Same slot: existing awaiters observe the
                        // replacement attempt's outcome, not a cancellation.
                        Self::dispatch_onto(core, &mut dispatch, Arc::clone(&slot));
                        slot
                    }
                }
            }

            (Some(slot), StartMode::RestartIfCompleted) => {
                if slot.is_resolved() {
                    Self::dispatch_fresh(core, &mut dispatch)
                } else {
                    slot
                }
            }
        };

        // Counted before the lock drops, so the orphan check below can never
        // fire between this caller's decision and its registration.
        core.awaiters.fetch_add(1, Ordering::SeqCst);
        slot
    }

    /// Re-check under the decision lock, then cancel the orphaned attempt.
    async fn cancel_if_abandoned(self: Arc<Self>, slot: Arc<OutcomeSlot<T>>) {
        let mut dispatch = self.decision.lock().await;
        if self.awaiters.load(Ordering::SeqCst) != 0 || slot.is_resolved() {
            return;
        }
        let still_bound = match self.current_slot() {
            Some(current) => Arc::ptr_eq(&current, &slot),
            None => false,
        };
        if !still_bound {
            return;
        }
        self.publish(self.event(EventKind::AwaitersGone));
        if let Some(active) = dispatch.attempt.take() {
            // The attempt resolves the slot as cancelled while unwinding.
            active.token.cancel();
        }
    }
}

/// Arms the ForceRestart takeover: once the in-flight attempt has been told
/// to abort for restart, *someone* must resolve the shared slot. If the
/// restarting caller is dropped before it can dispatch the replacement (its
/// own wait was cancelled mid-takeover), fail the displaced awaiters with a
/// cancellation rather than strand them on a slot nobody will resolve.
struct TakeoverGuard<T: Clone + Send + Sync + 'static> {
    core: Arc<JobCore<T>>,
    slot: Arc<OutcomeSlot<T>>,
    armed: bool,
}

impl<T: Clone + Send + Sync + 'static> Drop for TakeoverGuard<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.core.restart_requested.store(false, Ordering::SeqCst);
        self.slot.resolve(Err(JobError::Canceled));
    }
}

/// Decrements the awaiter count on every exit path out of `start`,
/// including caller-side cancellation (the future being dropped).
struct AwaiterGuard<T: Clone + Send + Sync + 'static> {
    core: Arc<JobCore<T>>,
    slot: Arc<OutcomeSlot<T>>,
}

impl<T: Clone + Send + Sync + 'static> Drop for AwaiterGuard<T> {
    fn drop(&mut self) {
        let remaining = self.core.awaiters.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining == 0 && !self.slot.is_resolved() {
            let core = Arc::clone(&self.core);
            let slot = Arc::clone(&self.slot);
            tokio::spawn(async move {
                core.cancel_if_abandoned(slot).await;
            });
        }
    }
}

/// Deduplicated, restartable, cancellation-aware shared job.
///
/// One instance wraps one [`Worker`](crate::Worker). While an attempt is in
/// flight every [`start`](SharedJob::start) joins it; afterwards `start`
/// re-runs the work according to its [`StartMode`]. The handle is cheap to
/// clone; all clones coordinate through the same state.
///
/// ## Example
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use jobcell::{JobError, SharedJob, WorkerFn, WorkerRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), JobError> {
/// let worker: WorkerRef<String> = WorkerFn::arc("greet", |_ctx: CancellationToken| async {
///     Ok::<_, JobError>("hello".to_string())
/// });
/// let job = SharedJob::new(worker);
///
/// // Both callers share one execution.
/// let (a, b) = tokio::join!(job.start(), job.start());
/// assert_eq!(a?, "hello");
/// assert_eq!(b?, "hello");
/// # Ok(())
/// # }
/// ```
pub struct SharedJob<T: Clone + Send + Sync + 'static> {
    core: Arc<JobCore<T>>,
}

impl<T: Clone + Send + Sync + 'static> Clone for SharedJob<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> SharedJob<T> {
    /// Creates a job around `worker` with a default diagnostic [`Bus`].
    pub fn new(worker: WorkerRef<T>) -> Self {
        Self::with_bus(worker, Bus::default())
    }

    /// Creates a job publishing diagnostics to the given bus.
    pub fn with_bus(worker: WorkerRef<T>, bus: Bus) -> Self {
        Self {
            core: Arc::new(JobCore {
                worker,
                serial: JOB_SERIAL.fetch_add(1, Ordering::Relaxed) + 1,
                bus,
                decision: Mutex::new(Dispatch { attempt: None }),
                slot: StdMutex::new(None),
                restart_requested: AtomicBool::new(false),
                awaiters: AtomicUsize::new(0),
                attempts: AtomicU64::new(0),
            }),
        }
    }

    /// Starts or joins the shared work with default options and awaits its
    /// outcome. See [`start_with`](SharedJob::start_with).
    pub async fn start(&self) -> Result<T, JobError> {
        self.start_with(StartOptions::default()).await
    }

    /// Starts, joins, or restarts the shared work per `options`, then awaits
    /// the shared outcome.
    ///
    /// ### Outcome
    /// - the worker's value on success,
    /// - the worker's error on failure (identical for every awaiter),
    /// - [`JobError::Canceled`] when the attempt is cancelled: worker not
    ///   executable, all awaiters gone, or [`cancel_all`](SharedJob::cancel_all).
    ///
    /// ### Cancellation semantics
    /// Dropping the returned future is loss of interest, not failure: the
    /// work keeps running for the remaining awaiters, and is cancelled only
    /// when the last one leaves. Callers wanting a deadline wrap this future
    /// externally (e.g. `tokio::time::timeout`).
    pub async fn start_with(&self, options: StartOptions) -> Result<T, JobError> {
        let slot = JobCore::decide(&self.core, options.mode).await;
        let _guard = AwaiterGuard {
            core: Arc::clone(&self.core),
            slot: Arc::clone(&slot),
        };
        slot.wait().await
    }

    /// Non-blocking advisory check: can `start` make progress right now?
    ///
    /// True while an attempt is in flight (joining is always allowed), or
    /// when idle and the worker reports it can execute.
    pub fn can_start(&self) -> bool {
        match self.core.current_slot() {
            Some(slot) if !slot.is_resolved() => true,
            _ => self.core.worker.can_execute(),
        }
    }

    /// Administrative cancellation: resolves the outcome as cancelled for
    /// every current and future awaiter, then cancels the in-flight attempt
    /// and waits for it to unwind.
    ///
    /// Unlike the last-awaiter-leaves path this affects everyone at once,
    /// regardless of how many callers remain.
    pub async fn cancel_all(&self) {
        let core = &self.core;
        let mut dispatch = core.decision.lock().await;
        core.publish(core.event(EventKind::CancelRequested));
        core.restart_requested.store(false, Ordering::SeqCst);

        let slot = match core.current_slot() {
            Some(slot) => slot,
            None => {
                let slot = Arc::new(OutcomeSlot::new());
                core.install_slot(&slot);
                slot
            }
        };
        slot.resolve(Err(JobError::Canceled));

        if let Some(active) = dispatch.attempt.take() {
            active.token.cancel();
            let _ = active.join.await;
        }
    }

    /// True while an attempt is running and the outcome is unresolved.
    pub fn is_active(&self) -> bool {
        matches!(self.core.current_slot(), Some(slot) if !slot.is_resolved())
    }

    /// True once the outcome is resolved (success, failure, or cancellation).
    pub fn is_complete(&self) -> bool {
        matches!(self.core.current_slot(), Some(slot) if slot.is_resolved())
    }

    /// True if the outcome resolved specifically via cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self.core.current_slot(), Some(slot) if slot.is_canceled())
    }

    /// Worker label, if any.
    pub fn label(&self) -> Option<&str> {
        self.core.worker.label()
    }

    /// Process-wide serial id of this instance (diagnostics only).
    pub fn serial(&self) -> u64 {
        self.core.serial
    }

    /// Diagnostic bus this job publishes to.
    pub fn bus(&self) -> &Bus {
        &self.core.bus
    }
}
