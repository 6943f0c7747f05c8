//! Polling configuration for composite operations.

use std::time::Duration;
use thiserror::Error;

/// Default upper bound on the delay between two polls.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);

/// Default overall deadline, measured from the first poll.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(1200);

/// Delay before the second poll; later delays double up to `max_interval`.
const INITIAL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors raised while building a [`WaiterConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WaiterConfigError {
    /// `max_interval` was zero.
    #[error("max_interval must be greater than zero")]
    ZeroInterval,
}

/// Interval ceiling and overall deadline for one waiter.
///
/// There is no process-wide default instance; every waiter is handed its own
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterConfig {
    max_interval: Duration,
    max_wait: Duration,
}

impl WaiterConfig {
    /// Create a configuration, rejecting a zero `max_interval`.
    pub fn new(max_interval: Duration, max_wait: Duration) -> Result<Self, WaiterConfigError> {
        if max_interval.is_zero() {
            return Err(WaiterConfigError::ZeroInterval);
        }
        Ok(Self {
            max_interval,
            max_wait,
        })
    }

    /// Same as [`WaiterConfig::new`] with whole seconds.
    pub fn from_secs(
        max_interval_seconds: u64,
        max_wait_seconds: u64,
    ) -> Result<Self, WaiterConfigError> {
        Self::new(
            Duration::from_secs(max_interval_seconds),
            Duration::from_secs(max_wait_seconds),
        )
    }

    /// Replace the interval ceiling.
    pub fn with_max_interval(self, max_interval: Duration) -> Result<Self, WaiterConfigError> {
        Self::new(max_interval, self.max_wait)
    }

    /// Replace the overall deadline.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn max_interval(&self) -> Duration {
        self.max_interval
    }

    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Delay after the `completed_polls`-th poll: 1s, 2s, 4s, ... capped at `max_interval`.
    pub fn interval_after(&self, completed_polls: u32) -> Duration {
        let exponent = completed_polls.saturating_sub(1);
        INITIAL_INTERVAL
            .saturating_mul(2_u32.saturating_pow(exponent))
            .min(self.max_interval)
    }
}

impl Default for WaiterConfig {
    fn default() -> Self {
        Self {
            max_interval: DEFAULT_MAX_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}
