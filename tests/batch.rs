//! Integration tests for the time-windowed batching adapter.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::timeout;

use jobcell::BatchStreamExt;

fn channel_stream<T: Send + 'static>(
    rx: mpsc::UnboundedReceiver<T>,
) -> impl futures::Stream<Item = T> {
    futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|v| (v, rx)) })
}

#[tokio::test]
async fn test_window_expiry_flushes_open_batch() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut batches = channel_stream(rx).batch_within(Duration::from_millis(50));

    tx.send(1).expect("send");
    tx.send(2).expect("send");

    // The source stays open; only the window can flush here.
    let first = timeout(Duration::from_secs(1), batches.next())
        .await
        .expect("flush within deadline");
    assert_eq!(first, Some(vec![1, 2]));

    tx.send(3).expect("send");
    drop(tx);

    let second = timeout(Duration::from_secs(1), batches.next())
        .await
        .expect("flush within deadline");
    assert_eq!(second, Some(vec![3]));
    assert_eq!(batches.next().await, None);
}

#[tokio::test]
async fn test_completion_flushes_partial_batch() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut batches = channel_stream(rx).batch_within(Duration::from_secs(60));

    tx.send("a").expect("send");
    tx.send("b").expect("send");
    drop(tx);

    // Far below the window: completion, not the timer, drives this flush.
    let only = timeout(Duration::from_millis(200), batches.next())
        .await
        .expect("flush on completion");
    assert_eq!(only, Some(vec!["a", "b"]));
    assert_eq!(batches.next().await, None);
}

#[tokio::test]
async fn test_separate_windows_produce_separate_batches() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut batches = channel_stream(rx).batch_within(Duration::from_millis(40));

    tx.send(1).expect("send");
    let first = timeout(Duration::from_secs(1), batches.next())
        .await
        .expect("first window");
    assert_eq!(first, Some(vec![1]));

    tx.send(2).expect("send");
    tx.send(3).expect("send");
    let second = timeout(Duration::from_secs(1), batches.next())
        .await
        .expect("second window");
    assert_eq!(second, Some(vec![2, 3]));
}
