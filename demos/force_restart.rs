//! # Example: force_restart
//!
//! Demonstrates preempting an in-flight attempt without failing its awaiters.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► spawn caller A: job.start()           (attempt 1, slow)
//!   ├─► sleep briefly, then ForceRestart      (attempt 1 invalidated)
//!   │     └─► attempt 2 resolves the SAME slot
//!   └─► caller A and the restarter both print attempt 2's value
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example force_restart
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use jobcell::{JobError, SharedJob, StartOptions, WorkerFn, WorkerRef};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== force_restart example ===\n");

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    let worker: WorkerRef<String> = WorkerFn::arc("render", move |ctx: CancellationToken| {
        let counter = Arc::clone(&counter);
        async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            // Attempt 1 simulates stale, slow work; attempt 2 is quick.
            let delay = if n == 1 {
                Duration::from_secs(30)
            } else {
                Duration::from_millis(100)
            };
            tokio::select! {
                _ = tokio::time::sleep(delay) => Ok(format!("rendered by attempt {n}")),
                _ = ctx.cancelled() => Err(JobError::Canceled),
            }
        }
    });

    let job = SharedJob::new(worker);

    let early = {
        let job = job.clone();
        tokio::spawn(async move {
            let outcome = job.start().await;
            println!("early awaiter: {outcome:?}");
            outcome
        })
    };

    tokio::time::sleep(Duration::from_millis(150)).await;
    println!("forcing restart while attempt 1 is in flight...");

    let forced = job.start_with(StartOptions::force_restart()).await?;
    println!("restarter:     Ok({forced:?})");

    early.await??;
    Ok(())
}
