//! # Example: shared_start
//!
//! Demonstrates outcome deduplication: three concurrent callers, one
//! execution, one shared result.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► build WorkerFn ("fetch", 200ms of simulated work)
//!   ├─► SharedJob::new(worker)
//!   ├─► spawn 3 × job.start()
//!   │     └─► first caller dispatches, the rest join the same slot
//!   └─► all three print the identical payload
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example shared_start
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use jobcell::{JobError, SharedJob, Subscribe, SubscriberSet, WorkerFn, WorkerRef, forward};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== shared_start example ===\n");

    let executions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&executions);

    let worker: WorkerRef<String> = WorkerFn::arc("fetch", move |_ctx: CancellationToken| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, JobError>("payload".to_string())
        }
    });

    let job = SharedJob::new(worker);

    // Optional: print lifecycle events (requires "logging" feature).
    #[cfg(feature = "logging")]
    {
        use jobcell::LogWriter;
        let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
        let _pump = forward(job.bus(), Arc::new(SubscriberSet::new(subs)));
    }
    #[cfg(not(feature = "logging"))]
    {
        let subs: Vec<Arc<dyn Subscribe>> = Vec::new();
        let _pump = forward(job.bus(), Arc::new(SubscriberSet::new(subs)));
    }

    let mut handles = Vec::new();
    for i in 0..3 {
        let job = job.clone();
        handles.push(tokio::spawn(async move {
            let outcome = job.start().await;
            println!("caller {i}: {outcome:?}");
            outcome
        }));
    }
    for handle in handles {
        handle.await??;
    }

    println!("\nexecutions: {}", executions.load(Ordering::SeqCst));
    Ok(())
}
