//! Integration tests for the shared job primitive: deduplication, restart
//! modes, awaiter accounting, and cancellation semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use jobcell::{
    EventKind, JobError, SharedJob, StartOptions, Worker, WorkerFn, WorkerRef,
};

/// Worker that counts executions and hook invocations.
///
/// Attempt `n` sleeps `delays[n - 1]` (last entry repeats) and succeeds with
/// `"done-n"`, or returns `Canceled` when its token fires first.
struct Probe {
    delays: Vec<Duration>,
    executable: AtomicBool,
    executions: AtomicUsize,
    completed: AtomicUsize,
    invalidated: AtomicUsize,
}

impl Probe {
    fn new(delays: Vec<Duration>) -> Arc<Self> {
        Arc::new(Self {
            delays,
            executable: AtomicBool::new(true),
            executions: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            invalidated: AtomicUsize::new(0),
        })
    }

    fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }

    fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn invalidated(&self) -> usize {
        self.invalidated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Worker for Probe {
    type Output = String;

    fn label(&self) -> Option<&str> {
        Some("probe")
    }

    fn can_execute(&self) -> bool {
        self.executable.load(Ordering::SeqCst)
    }

    async fn execute(&self, ctx: CancellationToken) -> Result<String, JobError> {
        let n = self.executions.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self
            .delays
            .get(n - 1)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or_default();
        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(format!("done-{n}")),
            _ = ctx.cancelled() => Err(JobError::Canceled),
        }
    }

    fn on_completed(&self, _outcome: &Result<String, JobError>) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_invalidated(&self) {
        self.invalidated.fetch_add(1, Ordering::SeqCst);
    }
}

fn job_of(probe: &Arc<Probe>) -> SharedJob<String> {
    SharedJob::new(Arc::clone(probe) as WorkerRef<String>)
}

async fn wait_until(what: &str, cond: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

#[tokio::test]
async fn test_concurrent_callers_share_one_execution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let worker: WorkerRef<String> = WorkerFn::arc("simulated", move |_ctx: CancellationToken| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, JobError>("Done".to_string())
        }
    });
    let job = SharedJob::new(worker);

    let mut handles = Vec::new();
    for _ in 0..3 {
        let job = job.clone();
        handles.push(tokio::spawn(async move { job.start().await }));
    }
    for handle in handles {
        let outcome = handle.await.expect("join").expect("outcome");
        assert_eq!(outcome, "Done");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_join_while_running_does_not_reexecute() {
    let probe = Probe::new(vec![Duration::from_millis(150)]);
    let job = job_of(&probe);

    let early = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    wait_until("first attempt running", || probe.executions() == 1).await;

    let late = job.start().await.expect("joined outcome");
    assert_eq!(late, "done-1");
    assert_eq!(early.await.expect("join").expect("outcome"), "done-1");
    assert_eq!(probe.executions(), 1);
    assert_eq!(probe.completed(), 1);
    assert_eq!(probe.invalidated(), 0);
}

#[tokio::test]
async fn test_restart_if_completed_runs_again() {
    let probe = Probe::new(vec![Duration::from_millis(10)]);
    let job = job_of(&probe);

    assert_eq!(job.start().await.expect("first"), "done-1");
    assert_eq!(job.start().await.expect("second"), "done-2");
    assert_eq!(probe.executions(), 2);
    assert_eq!(probe.completed(), 2);
}

#[tokio::test]
async fn test_force_restart_preempts_active_attempt() {
    let probe = Probe::new(vec![Duration::from_secs(10), Duration::from_millis(50)]);
    let job = job_of(&probe);

    let early = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    wait_until("first attempt running", || probe.executions() == 1).await;

    // Preempt attempt 1; both the restarter and the original awaiter must
    // observe attempt 2's result, never a cancellation.
    let forced = job
        .start_with(StartOptions::force_restart())
        .await
        .expect("replacement outcome");
    assert_eq!(forced, "done-2");
    assert_eq!(early.await.expect("join").expect("outcome"), "done-2");

    assert_eq!(probe.executions(), 2);
    assert_eq!(probe.invalidated(), 1);
    assert_eq!(probe.completed(), 1);
}

#[tokio::test]
async fn test_force_restart_on_resolved_returns_cached() {
    let probe = Probe::new(vec![Duration::from_millis(10)]);
    let job = job_of(&probe);

    assert_eq!(job.start().await.expect("first"), "done-1");
    let cached = job
        .start_with(StartOptions::force_restart())
        .await
        .expect("cached outcome");
    assert_eq!(cached, "done-1");
    assert_eq!(probe.executions(), 1);
}

#[tokio::test]
async fn test_all_awaiters_leaving_cancels_work() {
    let probe = Probe::new(vec![Duration::from_secs(10)]);
    let job = job_of(&probe);

    let h1 = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    let h2 = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    wait_until("attempt running", || probe.executions() == 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    h1.abort();
    h2.abort();

    wait_until("orphaned work cancelled", || job.is_canceled()).await;
    assert_eq!(probe.executions(), 1);
    assert_eq!(probe.invalidated(), 1);
    assert_eq!(probe.completed(), 1);
    assert!(job.is_complete());
    assert!(!job.is_active());
}

#[tokio::test]
async fn test_partial_cancellation_keeps_work_running() {
    let probe = Probe::new(vec![Duration::from_millis(300)]);
    let job = job_of(&probe);

    let h1 = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    let h2 = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    wait_until("attempt running", || probe.executions() == 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    h1.abort();
    assert_eq!(h2.await.expect("join").expect("outcome"), "done-1");
    assert_eq!(probe.executions(), 1);
    assert_eq!(probe.completed(), 1);
    assert_eq!(probe.invalidated(), 0);
}

#[tokio::test]
async fn test_cancel_all_reaches_every_awaiter() {
    let probe = Probe::new(vec![Duration::from_secs(10)]);
    let job = job_of(&probe);

    let h1 = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    let h2 = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    wait_until("attempt running", || probe.executions() == 1).await;

    job.cancel_all().await;

    assert!(matches!(h1.await.expect("join"), Err(JobError::Canceled)));
    assert!(matches!(h2.await.expect("join"), Err(JobError::Canceled)));
    assert!(job.is_complete());
    assert!(job.is_canceled());
    assert!(!job.is_active());
    assert_eq!(probe.completed(), 1);
    assert_eq!(probe.invalidated(), 1);
}

#[tokio::test]
async fn test_non_executable_worker_cancels_without_running() {
    let probe = Probe::new(vec![Duration::from_millis(10)]);
    probe.executable.store(false, Ordering::SeqCst);
    let job = job_of(&probe);

    assert!(!job.can_start());
    let outcome = job.start().await;
    assert!(matches!(outcome, Err(JobError::Canceled)));
    assert_eq!(probe.executions(), 0);
    assert_eq!(probe.invalidated(), 1);
    assert_eq!(probe.completed(), 0);
    assert!(job.is_canceled());
}

#[tokio::test]
async fn test_work_failure_surfaces_identically_to_all_awaiters() {
    let worker: WorkerRef<String> = WorkerFn::arc("flaky", |_ctx: CancellationToken| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err::<String, _>(JobError::fail("boom"))
    });
    let job = SharedJob::new(worker);

    let (a, b) = tokio::join!(job.start(), job.start());
    for outcome in [a, b] {
        match outcome {
            Err(JobError::Fail { error }) => assert_eq!(error, "boom"),
            other => panic!("expected failure, got {other:?}"),
        }
    }
    assert!(job.is_complete());
    assert!(!job.is_canceled());
}

#[tokio::test]
async fn test_can_start_reflects_state() {
    let probe = Probe::new(vec![Duration::from_millis(100)]);
    let job = job_of(&probe);

    assert!(job.can_start());

    let running = {
        let job = job.clone();
        tokio::spawn(async move { job.start().await })
    };
    wait_until("attempt running", || probe.executions() == 1).await;

    // Joining an active attempt is always allowed, whatever the predicate says.
    probe.executable.store(false, Ordering::SeqCst);
    assert!(job.can_start());

    running.await.expect("join").expect("outcome");
    assert!(!job.can_start());
}

#[tokio::test]
async fn test_hook_panic_never_masks_outcome() {
    struct PanickyHooks;

    #[async_trait]
    impl Worker for PanickyHooks {
        type Output = String;

        async fn execute(&self, _ctx: CancellationToken) -> Result<String, JobError> {
            Ok("value".to_string())
        }

        fn on_completed(&self, _outcome: &Result<String, JobError>) {
            panic!("completion hook failed");
        }

        fn on_invalidated(&self) {
            panic!("invalidation hook failed");
        }
    }

    let job = SharedJob::new(Arc::new(PanickyHooks) as WorkerRef<String>);
    let mut rx = job.bus().subscribe();

    assert_eq!(job.start().await.expect("outcome"), "value");

    let mut saw_hook_panic = false;
    while let Ok(ev) = rx.try_recv() {
        saw_hook_panic |= ev.kind == EventKind::HookPanicked;
    }
    assert!(saw_hook_panic, "hook panic should surface as an event");
}

#[tokio::test]
async fn test_lifecycle_events_are_published() {
    let probe = Probe::new(vec![Duration::from_millis(10)]);
    let job = job_of(&probe);
    let mut rx = job.bus().subscribe();

    job.start().await.expect("outcome");

    let mut kinds = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        assert_eq!(ev.serial, Some(job.serial()));
        kinds.push(ev.kind);
    }
    assert!(kinds.contains(&EventKind::JobStarting));
    assert!(kinds.contains(&EventKind::JobCompleted));
}

#[tokio::test]
async fn test_serials_are_process_wide_monotonic() {
    let a = job_of(&Probe::new(vec![Duration::ZERO]));
    let b = job_of(&Probe::new(vec![Duration::ZERO]));
    assert!(b.serial() > a.serial());
}
