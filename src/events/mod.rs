//! Diagnostic events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to diagnostic events emitted by a
//! [`SharedJob`](crate::SharedJob): attempt lifecycle, restart and
//! cancellation bookkeeping, and hook failures.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the job's controller (`SharedJob`) and its per-attempt
//!   supervisor task.
//! - **Consumers**: anything holding a receiver from [`Bus::subscribe`],
//!   typically a [`SubscriberSet`](crate::SubscriberSet) pump.
//!
//! Publishing is fire-and-forget: a missing, slow, or broken consumer can
//! never affect a job outcome.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
