//! Capability traits for polled snapshots and their errors, plus the
//! desired-state set the waiter compares against.

use std::collections::BTreeSet;

/// Implemented by snapshot types the waiter can poll.
///
/// Types that carry a lifecycle state or status return it; types without
/// such a field keep the default, and a wait on them is never satisfied by a
/// state match.
pub trait HasState {
    fn state(&self) -> Option<&str> {
        None
    }
}

impl<T: HasState + ?Sized> HasState for &T {
    fn state(&self) -> Option<&str> {
        (**self).state()
    }
}

/// Lets the waiter recognise a "resource not found" failure from a status fetch.
pub trait NotFound {
    fn is_not_found(&self) -> bool;
}

/// Set of acceptable terminal states, compared case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredStates {
    states: BTreeSet<String>,
    succeed_on_not_found: bool,
}

impl DesiredStates {
    pub fn new<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            states: states
                .into_iter()
                .map(|state| state.as_ref().to_lowercase())
                .collect(),
            succeed_on_not_found: false,
        }
    }

    /// An empty set: the composite operation returns without polling.
    pub fn none() -> Self {
        Self::default()
    }

    /// Mark the wait as delete-like: a not-found poll counts as success.
    pub fn succeed_on_not_found(mut self) -> Self {
        self.succeed_on_not_found = true;
        self
    }

    pub fn is_delete_like(&self) -> bool {
        self.succeed_on_not_found
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.contains(&state.to_lowercase())
    }

    /// True when the snapshot exposes a state and that state is in the set.
    pub fn is_met_by<S: HasState + ?Sized>(&self, snapshot: &S) -> bool {
        snapshot.state().is_some_and(|state| self.contains(state))
    }

    /// States in their normalised (lower-case) form.
    pub fn to_vec(&self) -> Vec<String> {
        self.states.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for DesiredStates {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
