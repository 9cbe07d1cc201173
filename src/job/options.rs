//! # Start options for shared jobs.
//!
//! [`StartMode`] decides what [`SharedJob::start_with`](crate::SharedJob::start_with)
//! does when an outcome already exists:
//!
//! - [`StartMode::RestartIfCompleted`] joins an in-flight attempt, and starts
//!   a fresh one only when the previous outcome is already resolved (default).
//! - [`StartMode::ForceRestart`] preempts an *unresolved* attempt and replaces
//!   it with a new one; awaiters of the old attempt stay bound to the outcome
//!   the replacement produces. A resolved outcome is returned as-is; forced
//!   restart never restarts a completed job. That asymmetry is the documented
//!   contract: only `RestartIfCompleted` restarts completed jobs.

/// Decides how `start` treats an existing outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StartMode {
    /// Join an in-flight attempt; restart only a completed one (default).
    #[default]
    RestartIfCompleted,
    /// Preempt an in-flight attempt; return a completed outcome as-is.
    ForceRestart,
}

/// Options accepted by [`SharedJob::start_with`](crate::SharedJob::start_with).
#[derive(Clone, Copy, Debug, Default)]
pub struct StartOptions {
    /// Restart behavior when an outcome already exists.
    pub mode: StartMode,
}

impl StartOptions {
    /// Options with [`StartMode::RestartIfCompleted`].
    pub fn restart_if_completed() -> Self {
        Self {
            mode: StartMode::RestartIfCompleted,
        }
    }

    /// Options with [`StartMode::ForceRestart`].
    pub fn force_restart() -> Self {
        Self {
            mode: StartMode::ForceRestart,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_joins_active_attempts() {
        assert_eq!(StartOptions::default().mode, StartMode::RestartIfCompleted);
        assert_eq!(
            StartOptions::restart_if_completed().mode,
            StartOptions::default().mode
        );
    }

    #[test]
    fn test_force_restart_constructor() {
        assert_eq!(StartOptions::force_restart().mode, StartMode::ForceRestart);
    }
}
