//! # Time-windowed batching over asynchronous sequences.
//!
//! A single adapter, [`batch_within`](BatchStreamExt::batch_within): collect
//! stream items into `Vec`s and flush each batch when a time window expires
//! or the source completes. Standalone; the job core does not depend on it.

mod batch;

pub use batch::{BatchStreamExt, BatchWithin};
