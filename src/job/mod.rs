//! Job core: deduplicated, restartable, cancellation-aware execution.
//!
//! This module contains the embedded implementation of the shared job
//! primitive. The public API from this module is [`SharedJob`] plus the
//! [`StartOptions`]/[`StartMode`] pair that configures `start`.
//!
//! Internal modules:
//! - [`slot`]: single-assignment outcome cell all awaiters observe;
//! - [`shared`]: the controller (start/restart decisions, awaiter
//!   accounting, administrative cancellation);
//! - [`supervisor`]: runs one execution attempt and interprets
//!   success/failure/restart, invoking worker hooks.

mod options;
mod shared;
mod slot;
mod supervisor;

pub use options::{StartMode, StartOptions};
pub use shared::SharedJob;
