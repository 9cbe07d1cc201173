//! # Event subscribers for job diagnostics.
//!
//! This module provides the [`Subscribe`] trait and the fan-out machinery for
//! handling diagnostic events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! SharedJob ── publish(Event) ──► Bus ──► forward() pump
//!                                             │
//!                                             ▼
//!                                       SubscriberSet
//!                                  ┌─────────┼─────────┐
//!                                  ▼         ▼         ▼
//!                             [queue S1] [queue S2] [queue SN]
//!                                  │         │         │
//!                             worker S1 worker S2 worker SN
//!                                  ▼         ▼         ▼
//!                            sub.on_event(&Event)  (per subscriber)
//! ```
//!
//! Subscribers are isolated: a slow subscriber drops its own events, a
//! panicking subscriber is contained, and neither can touch a job outcome.

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::{SubscriberSet, forward};
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
