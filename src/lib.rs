//! # jobcell
//!
//! **jobcell** is a small concurrency library around one primitive: the
//! [`SharedJob`], a deduplicated, restartable, cancellation-aware wrapper
//! for a unit of asynchronous work.
//!
//! While the work is in flight, any number of independent callers can request
//! it and all receive the *same* outcome without re-triggering the work.
//! Callers may also force a restart that invalidates the in-flight attempt
//! without surfacing spurious failures to anyone still waiting.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  caller 1    caller 2    caller N
//!     │           │           │          start(options)
//!     └───────────┼───────────┘
//!                 ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │  SharedJob<T>                                              │
//! │  - decision lock (serializes join / restart / dispatch)    │
//! │  - OutcomeSlot (single-assignment, broadcast-on-resolve)   │
//! │  - awaiter accounting (orphan cancellation)                │
//! │  - Bus (diagnostic events, fire-and-forget)                │
//! └──────────────────────────┬─────────────────────────────────┘
//!                            ▼
//!                  run_attempt (one per job, at most)
//!                            │
//!                            ▼
//!              Worker::execute(CancellationToken)
//!              + on_completed / on_invalidated hooks
//! ```
//!
//! ### Lifecycle
//! ```text
//! start(RestartIfCompleted)           start(ForceRestart)
//!   ├─ no outcome   → dispatch          ├─ unresolved → cancel attempt,
//!   ├─ unresolved   → join              │               redispatch onto the
//!   ├─ resolved     → fresh dispatch    │               SAME slot (awaiters
//!   └─ await slot                       │               see the new result)
//!                                       └─ resolved   → cached outcome as-is
//!
//! last awaiter drops its wait  → in-flight attempt cancelled as orphaned
//! cancel_all()                 → everyone observes Canceled immediately
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits              |
//! |-----------------|----------------------------------------------------------|---------------------------------|
//! | **Jobs**        | Deduplicated, restartable shared execution.              | [`SharedJob`], [`StartOptions`] |
//! | **Workers**     | Define the work and its lifecycle hooks.                 | [`Worker`], [`WorkerFn`]        |
//! | **Errors**      | Typed outcome errors, clonable for fan-out.              | [`JobError`]                    |
//! | **Diagnostics** | Broadcast events; subscriber fan-out with isolation.     | [`Bus`], [`Event`], [`Subscribe`] |
//! | **Batching**    | Time-windowed batching over async sequences.             | [`BatchStreamExt`]              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use jobcell::{JobError, SharedJob, WorkerFn, WorkerRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), JobError> {
//!     let worker: WorkerRef<String> = WorkerFn::arc("fetch", |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(JobError::Canceled);
//!         }
//!         // load something expensive...
//!         Ok("payload".to_string())
//!     });
//!
//!     let job = SharedJob::new(worker);
//!
//!     // Three concurrent callers, one execution, one shared outcome.
//!     let (a, b, c) = tokio::join!(job.start(), job.start(), job.start());
//!     assert_eq!(a?, "payload");
//!     assert_eq!(b?, "payload");
//!     assert_eq!(c?, "payload");
//!     Ok(())
//! }
//! ```

mod error;
mod events;
mod job;
mod stream;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use error::JobError;
pub use events::{Bus, Event, EventKind};
pub use job::{SharedJob, StartMode, StartOptions};
pub use stream::{BatchStreamExt, BatchWithin};
pub use subscribers::{Subscribe, SubscriberSet, forward};
pub use workers::{Worker, WorkerFn, WorkerRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
