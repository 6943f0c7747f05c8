//! Retry seam consulted by the transport after a failed attempt.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

pub trait RetryStrategy: Send + Sync + fmt::Debug {
    /// Delay before the next attempt, or `None` to give up. `attempt` is 1
    /// after the first failure.
    fn next_delay(&self, attempt: u32, error: &ApiError) -> Option<Duration>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryStrategy for NoRetry {
    fn next_delay(&self, _attempt: u32, _error: &ApiError) -> Option<Duration> {
        None
    }
}

/// Retries retryable failures with a constant delay, up to `max_attempts`
/// attempts in total.
#[derive(Debug, Clone, Copy)]
pub struct FixedRetry {
    max_attempts: u32,
    delay: Duration,
}

impl FixedRetry {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl RetryStrategy for FixedRetry {
    fn next_delay(&self, attempt: u32, error: &ApiError) -> Option<Duration> {
        (attempt < self.max_attempts && error.is_retryable()).then_some(self.delay)
    }
}
