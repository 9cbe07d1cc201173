//! # Time-windowed batching adapter.
//!
//! [`BatchWithin`] collects items from an inner stream into a `Vec`, flushing
//! when the window measured from the **first buffered item** expires, or when
//! the source completes (the final partial batch is flushed).
//!
//! ## Rules
//! - Empty batches are never emitted; an idle source produces nothing.
//! - The window timer starts when a batch receives its first item, not per
//!   item, so a steady trickle still flushes every `window`.
//! - After the source completes and the remainder is flushed, the adapter
//!   yields `None` forever.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//! use futures::StreamExt;
//! use jobcell::BatchStreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut batches = futures::stream::iter(1..=5).batch_within(Duration::from_millis(50));
//! assert_eq!(batches.next().await, Some(vec![1, 2, 3, 4, 5]));
//! assert_eq!(batches.next().await, None);
//! # }
//! ```

use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use tokio::time::{Sleep, sleep};

/// Extension trait adding time-windowed batching to any [`Stream`].
pub trait BatchStreamExt: Stream {
    /// Collects items into `Vec`s, flushing on window expiry or completion.
    fn batch_within(self, window: Duration) -> BatchWithin<Self>
    where
        Self: Sized,
    {
        BatchWithin::new(self, window)
    }
}

impl<S: Stream> BatchStreamExt for S {}

/// Stream adapter produced by [`BatchStreamExt::batch_within`].
pub struct BatchWithin<S: Stream> {
    stream: Pin<Box<S>>,
    window: Duration,
    buf: Vec<S::Item>,
    /// Armed when `buf` receives its first item; disarmed on flush.
    deadline: Option<Pin<Box<Sleep>>>,
    done: bool,
}

// Safe: `stream` and `deadline` are already `Pin<Box<_>>` (independently pinned),
// and the remaining fields (`buf`, `window`, `done`) are freely movable. No field
// is pin-projected out of `Self`, so treating `BatchWithin` as `Unpin` is sound.
impl<S: Stream> Unpin for BatchWithin<S> {}

impl<S: Stream> BatchWithin<S> {
    fn new(stream: S, window: Duration) -> Self {
        Self {
            stream: Box::pin(stream),
            window,
            buf: Vec::new(),
            deadline: None,
            done: false,
        }
    }
}

impl<S: Stream> Stream for BatchWithin<S> {
    type Item = Vec<S::Item>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        loop {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    if this.buf.is_empty() {
                        this.deadline = Some(Box::pin(sleep(this.window)));
                    }
                    this.buf.push(item);
                }
                Poll::Ready(None) => {
                    this.done = true;
                    this.deadline = None;
                    return if this.buf.is_empty() {
                        Poll::Ready(None)
                    } else {
                        Poll::Ready(Some(mem::take(&mut this.buf)))
                    };
                }
                Poll::Pending => {
                    if let Some(deadline) = this.deadline.as_mut() {
                        if deadline.as_mut().poll(cx).is_ready() {
                            this.deadline = None;
                            return Poll::Ready(Some(mem::take(&mut this.buf)));
                        }
                    }
                    return Poll::Pending;
                }
            }
        }
    }
}
