//! The poll-until-state loop shared by every composite operation.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::WaiterConfig;
use crate::error::WaitError;
use crate::state::{DesiredStates, HasState, NotFound};

/// Successful outcome of a composite operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<I, S> {
    /// No desired states were given; the initiating result is returned untouched.
    Initiated(I),
    /// First snapshot observed in one of the desired states.
    Reached(S),
    /// A delete-like wait saw the resource disappear. `None` when the delete
    /// call itself reported the resource as already gone.
    Deleted(Option<I>),
}

impl<I, S> Completion<I, S> {
    pub fn snapshot(&self) -> Option<&S> {
        match self {
            Self::Reached(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn into_snapshot(self) -> Option<S> {
        match self {
            Self::Reached(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }
}

enum Polled<S> {
    Reached(S),
    Gone,
}

enum PollFailure<S, E> {
    Fetch(E),
    Timeout {
        last_snapshot: Option<S>,
        elapsed: Duration,
    },
    Cancelled {
        elapsed: Duration,
    },
}

impl<S, E> PollFailure<S, E> {
    fn with_partial<I>(self, initiated: I, desired: &DesiredStates) -> WaitError<I, S, E> {
        let partial_results = vec![initiated];
        match self {
            Self::Fetch(source) => WaitError::Composite {
                partial_results,
                source,
            },
            Self::Timeout {
                last_snapshot,
                elapsed,
            } => WaitError::Timeout {
                partial_results,
                last_snapshot,
                elapsed,
                desired: desired.to_vec(),
            },
            Self::Cancelled { elapsed } => WaitError::Cancelled {
                partial_results,
                elapsed,
            },
        }
    }
}

/// Runs a mutating call and blocks the calling task until the affected
/// resource or work request reaches a desired state.
///
/// The waiter holds no state between invocations; one instance can drive any
/// number of concurrent operations.
#[derive(Debug, Clone, Default)]
pub struct OperationWaiter {
    config: WaiterConfig,
    cancellation: Option<CancellationToken>,
}

impl OperationWaiter {
    pub fn new(config: WaiterConfig) -> Self {
        Self {
            config,
            cancellation: None,
        }
    }

    /// Abort polling as soon as `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &WaiterConfig {
        &self.config
    }

    /// Same waiter, and the same cancellation token, polling with `config`.
    pub fn with_config(&self, config: WaiterConfig) -> Self {
        Self {
            config,
            cancellation: self.cancellation.clone(),
        }
    }

    /// Await `initiate` once, then poll `fetch_status` with the id `locate`
    /// extracts from its result until a snapshot matches `desired`.
    ///
    /// `locate` decides which flavor of handle is polled: the resource's own
    /// id or an out-of-band work-request id.
    pub async fn execute_and_wait<I, S, E, L, F, Fut>(
        &self,
        initiate: impl Future<Output = Result<I, E>>,
        locate: L,
        fetch_status: F,
        desired: &DesiredStates,
    ) -> Result<Completion<I, S>, WaitError<I, S, E>>
    where
        L: FnOnce(&I) -> Option<String>,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<S, E>>,
        S: HasState,
        E: NotFound,
    {
        let initiated = initiate.await.map_err(|source| WaitError::Composite {
            partial_results: Vec::new(),
            source,
        })?;

        if desired.is_empty() {
            return Ok(Completion::Initiated(initiated));
        }

        let Some(id) = locate(&initiated) else {
            return Err(WaitError::MissingPollTarget {
                partial_results: vec![initiated],
            });
        };

        match self.poll_until(&id, fetch_status, desired, None).await {
            Ok(Polled::Reached(snapshot)) => Ok(Completion::Reached(snapshot)),
            Ok(Polled::Gone) => Ok(Completion::Deleted(Some(initiated))),
            Err(failure) => Err(failure.with_partial(initiated, desired)),
        }
    }

    /// Delete-like variant: fetch `id` before awaiting `delete`, then poll the
    /// same id, treating "not found" as having reached the deleted state.
    ///
    /// With no desired states the delete is awaited on its own and nothing is
    /// fetched.
    pub async fn delete_and_wait<I, S, E, F, Fut>(
        &self,
        id: &str,
        delete: impl Future<Output = Result<I, E>>,
        mut fetch_status: F,
        desired: &DesiredStates,
    ) -> Result<Completion<I, S>, WaitError<I, S, E>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<S, E>>,
        S: HasState,
        E: NotFound,
    {
        if desired.is_empty() {
            return delete
                .await
                .map(Completion::Initiated)
                .map_err(|source| WaitError::Composite {
                    partial_results: Vec::new(),
                    source,
                });
        }

        let existing = fetch_status(id.to_owned())
            .await
            .map_err(|source| WaitError::Composite {
                partial_results: Vec::new(),
                source,
            })?;

        let initiated = match delete.await {
            Ok(initiated) => initiated,
            Err(e) if e.is_not_found() => {
                log::info!("{id} was already gone when the delete was issued");
                return Ok(Completion::Deleted(None));
            }
            Err(source) => {
                return Err(WaitError::Composite {
                    partial_results: Vec::new(),
                    source,
                })
            }
        };

        let desired = desired.clone().succeed_on_not_found();
        match self
            .poll_until(id, fetch_status, &desired, Some(existing))
            .await
        {
            Ok(Polled::Reached(snapshot)) => Ok(Completion::Reached(snapshot)),
            Ok(Polled::Gone) => Ok(Completion::Deleted(Some(initiated))),
            Err(failure) => Err(failure.with_partial(initiated, &desired)),
        }
    }

    async fn poll_until<S, E, F, Fut>(
        &self,
        id: &str,
        mut fetch_status: F,
        desired: &DesiredStates,
        mut last_snapshot: Option<S>,
    ) -> Result<Polled<S>, PollFailure<S, E>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<S, E>>,
        S: HasState,
        E: NotFound,
    {
        let started = Instant::now();
        let max_wait = self.config.max_wait();
        let mut polls: u32 = 0;

        loop {
            if self.is_cancelled() {
                return Err(PollFailure::Cancelled {
                    elapsed: started.elapsed(),
                });
            }

            polls = polls.saturating_add(1);
            let snapshot = match fetch_status(id.to_owned()).await {
                Ok(snapshot) => snapshot,
                Err(e) if desired.is_delete_like() && e.is_not_found() => {
                    log::info!("{id} no longer exists after {polls} poll(s), treating as deleted");
                    return Ok(Polled::Gone);
                }
                Err(e) => return Err(PollFailure::Fetch(e)),
            };

            log::debug!("poll {polls} of {id}: state {:?}", snapshot.state());
            if desired.is_met_by(&snapshot) {
                log::info!(
                    "{id} reached state {:?} after {polls} poll(s)",
                    snapshot.state()
                );
                return Ok(Polled::Reached(snapshot));
            }
            last_snapshot = Some(snapshot);

            let elapsed = started.elapsed();
            if elapsed >= max_wait {
                log::warn!(
                    "gave up on {id} after {elapsed:?}; desired states {:?}",
                    desired.to_vec()
                );
                return Err(PollFailure::Timeout {
                    last_snapshot,
                    elapsed,
                });
            }

            let delay = self.config.interval_after(polls).min(max_wait - elapsed);
            if self.sleep_or_cancel(delay).await {
                return Err(PollFailure::Cancelled {
                    elapsed: started.elapsed(),
                });
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Returns true when cancellation interrupted the sleep.
    async fn sleep_or_cancel(&self, delay: Duration) -> bool {
        match &self.cancellation {
            Some(token) => tokio::select! {
                () = token.cancelled() => true,
                () = sleep(delay) => false,
            },
            None => {
                sleep(delay).await;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Group {
        id: String,
        lifecycle_state: String,
    }

    impl HasState for Group {
        fn state(&self) -> Option<&str> {
            Some(&self.lifecycle_state)
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum StubError {
        NotFound,
        Internal,
    }

    impl NotFound for StubError {
        fn is_not_found(&self) -> bool {
            matches!(self, Self::NotFound)
        }
    }

    fn group(state: &str) -> Group {
        Group {
            id: "group-1".to_string(),
            lifecycle_state: state.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_schedule_is_capped_by_deadline() {
        let waiter = OperationWaiter::new(WaiterConfig::from_secs(30, 5).unwrap());
        let started = Instant::now();
        let polled_at = RefCell::new(Vec::new());

        let result = waiter
            .execute_and_wait(
                async { Ok::<_, StubError>(group("CREATING")) },
                |g: &Group| Some(g.id.clone()),
                |_id| {
                    polled_at.borrow_mut().push(started.elapsed().as_secs());
                    async { Ok(group("CREATING")) }
                },
                &DesiredStates::new(["ACTIVE"]),
            )
            .await;

        assert!(result.unwrap_err().is_timeout());
        // 1s, 2s, then the remaining 2s of the 5s deadline.
        assert_eq!(*polled_at.borrow(), vec![0, 1, 3, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_poll_target() {
        let waiter = OperationWaiter::default();
        let fetches = Cell::new(0);

        let err = waiter
            .execute_and_wait(
                async { Ok::<_, StubError>(group("CREATING")) },
                |_: &Group| None,
                |_id| {
                    fetches.set(fetches.get() + 1);
                    async { Ok(group("ACTIVE")) }
                },
                &DesiredStates::new(["ACTIVE"]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WaitError::MissingPollTarget { .. }));
        assert_eq!(err.partial_results(), &[group("CREATING")]);
        assert_eq!(fetches.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_failure_when_not_delete_like() {
        let waiter = OperationWaiter::default();

        let err = waiter
            .execute_and_wait(
                async { Ok::<_, StubError>(group("CREATING")) },
                |g: &Group| Some(g.id.clone()),
                |_id| async { Err::<Group, _>(StubError::NotFound) },
                &DesiredStates::new(["ACTIVE"]),
            )
            .await
            .unwrap_err();

        assert_eq!(err.cause(), Some(&StubError::NotFound));
        assert_eq!(err.into_partial_results(), vec![group("CREATING")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_call_not_found_counts_as_deleted() {
        let waiter = OperationWaiter::default();
        let script = RefCell::new(VecDeque::from([Ok(group("ACTIVE"))]));

        let completion = waiter
            .delete_and_wait(
                "group-1",
                async { Err::<(), _>(StubError::NotFound) },
                |_id| {
                    let next = script.borrow_mut().pop_front().expect("unexpected poll");
                    async move { next }
                },
                &DesiredStates::new(["DELETED"]),
            )
            .await
            .unwrap();

        assert_eq!(completion, Completion::Deleted(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_prefetch_failure_skips_delete() {
        let waiter = OperationWaiter::default();
        let deleted = Cell::new(false);

        let err = waiter
            .delete_and_wait(
                "group-1",
                async {
                    deleted.set(true);
                    Ok::<_, StubError>(())
                },
                |_id| async { Err::<Group, _>(StubError::Internal) },
                &DesiredStates::new(["DELETED"]),
            )
            .await
            .unwrap_err();

        assert!(!deleted.get());
        assert!(err.partial_results().is_empty());
        assert_eq!(err.cause(), Some(&StubError::Internal));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_without_desired_states_never_fetches() {
        let waiter = OperationWaiter::default();
        let fetches = Cell::new(0);
        let deleted = Cell::new(false);

        let completion = waiter
            .delete_and_wait(
                "group-1",
                async {
                    deleted.set(true);
                    Ok::<_, StubError>("req-1")
                },
                |_id| {
                    fetches.set(fetches.get() + 1);
                    async { Err::<Group, _>(StubError::NotFound) }
                },
                &DesiredStates::none(),
            )
            .await
            .unwrap();

        assert_eq!(completion, Completion::Initiated("req-1"));
        assert!(deleted.get());
        assert_eq!(fetches.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_without_desired_states_propagates_delete_error() {
        let waiter = OperationWaiter::default();
        let fetches = Cell::new(0);

        let err = waiter
            .delete_and_wait(
                "group-1",
                async { Err::<(), _>(StubError::Internal) },
                |_id| {
                    fetches.set(fetches.get() + 1);
                    async { Ok(group("ACTIVE")) }
                },
                &DesiredStates::none(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.cause(), Some(&StubError::Internal));
        assert!(err.partial_results().is_empty());
        assert_eq!(fetches.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_timeout_keeps_prefetched_snapshot() {
        let waiter = OperationWaiter::new(WaiterConfig::from_secs(1, 0).unwrap());
        let script = RefCell::new(VecDeque::from([Ok(group("ACTIVE")), Ok(group("DELETING"))]));

        let err = waiter
            .delete_and_wait(
                "group-1",
                async { Ok::<_, StubError>("req-1") },
                |_id| {
                    let next = script.borrow_mut().pop_front().expect("unexpected poll");
                    async move { next }
                },
                &DesiredStates::new(["DELETED"]),
            )
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err.last_snapshot(), Some(&group("DELETING")));
        assert_eq!(err.partial_results(), &["req-1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_stops_wait() {
        let token = CancellationToken::new();
        token.cancel();
        let waiter = OperationWaiter::default().with_cancellation(token);

        let err = waiter
            .execute_and_wait(
                async { Ok::<_, StubError>(group("CREATING")) },
                |g: &Group| Some(g.id.clone()),
                |_id| async { Ok(group("CREATING")) },
                &DesiredStates::new(["ACTIVE"]),
            )
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(!err.is_timeout());
        assert_eq!(err.partial_results(), &[group("CREATING")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_config_keeps_cancellation() {
        let token = CancellationToken::new();
        let waiter = OperationWaiter::default()
            .with_cancellation(token.clone())
            .with_config(WaiterConfig::from_secs(2, 10).unwrap());
        assert_eq!(waiter.config().max_wait(), Duration::from_secs(10));

        token.cancel();
        let err = waiter
            .execute_and_wait(
                async { Ok::<_, StubError>(group("CREATING")) },
                |g: &Group| Some(g.id.clone()),
                |_id| async { Ok(group("CREATING")) },
                &DesiredStates::new(["ACTIVE"]),
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
