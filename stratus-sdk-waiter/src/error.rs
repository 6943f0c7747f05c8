//! Errors surfaced by composite operations.

use std::time::Duration;
use thiserror::Error;

/// Failure of a composite operation.
///
/// `I` is the initiating call's result, `S` the polled snapshot and `E` the
/// collaborator error. Variants that occur after the initiating call succeeded
/// carry its result in `partial_results` so callers can inspect what was
/// started.
#[derive(Debug, Error)]
pub enum WaitError<I, S, E> {
    /// The initiating call or a status poll failed.
    #[error("composite operation failed: {source}")]
    Composite {
        partial_results: Vec<I>,
        #[source]
        source: E,
    },

    /// The initiating result carried no id to poll.
    #[error("initiating call returned no identifier to poll")]
    MissingPollTarget { partial_results: Vec<I> },

    /// The deadline passed before a desired state was observed.
    #[error("timed out after {elapsed:?} waiting for states {desired:?}")]
    Timeout {
        partial_results: Vec<I>,
        last_snapshot: Option<S>,
        elapsed: Duration,
        desired: Vec<String>,
    },

    /// The cancellation token fired while waiting.
    #[error("wait cancelled after {elapsed:?}")]
    Cancelled {
        partial_results: Vec<I>,
        elapsed: Duration,
    },
}

impl<I, S, E> WaitError<I, S, E> {
    pub fn partial_results(&self) -> &[I] {
        match self {
            Self::Composite {
                partial_results, ..
            }
            | Self::MissingPollTarget { partial_results }
            | Self::Timeout {
                partial_results, ..
            }
            | Self::Cancelled {
                partial_results, ..
            } => partial_results,
        }
    }

    pub fn into_partial_results(self) -> Vec<I> {
        match self {
            Self::Composite {
                partial_results, ..
            }
            | Self::MissingPollTarget { partial_results }
            | Self::Timeout {
                partial_results, ..
            }
            | Self::Cancelled {
                partial_results, ..
            } => partial_results,
        }
    }

    /// Snapshot observed last before a timeout.
    pub fn last_snapshot(&self) -> Option<&S> {
        match self {
            Self::Timeout { last_snapshot, .. } => last_snapshot.as_ref(),
            _ => None,
        }
    }

    /// Underlying collaborator error, if the failure came from one.
    pub fn cause(&self) -> Option<&E> {
        match self {
            Self::Composite { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
