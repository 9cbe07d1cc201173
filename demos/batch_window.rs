//! # Example: batch_window
//!
//! Demonstrates time-windowed batching over an asynchronous sequence.
//!
//! ## Flow
//! ```text
//! producer task ── send ──► channel-backed stream ──► batch_within(100ms)
//!                                                        │
//!                               window expiry / stream end ─► Vec<_> batches
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example batch_window
//! ```

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;

use jobcell::BatchStreamExt;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== batch_window example ===\n");

    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for burst in 0..3 {
            for i in 0..4 {
                let _ = tx.send(burst * 10 + i);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
        // tx drops here: the final partial batch flushes on completion.
    });

    let stream =
        futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|v| (v, rx)) });
    let mut batches = stream.batch_within(Duration::from_millis(100));

    while let Some(batch) = batches.next().await {
        println!("batch: {batch:?}");
    }
    println!("\nstream completed");
}
