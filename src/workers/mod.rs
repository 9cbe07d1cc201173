//! # Worker abstractions.
//!
//! This module provides the worker-side contract of a shared job:
//! - [`Worker`] - trait defining the work and its lifecycle hooks
//! - [`WorkerFn`] - function-backed worker implementation
//! - [`WorkerRef`] - shared reference to a worker (`Arc<dyn Worker>`)

mod worker;
mod worker_fn;

pub use worker::{Worker, WorkerRef};
pub use worker_fn::WorkerFn;
