//! Composite operations for the Stratus SDK.
//!
//! Cloud control-plane calls return as soon as a change is accepted. A
//! composite operation issues such a call and then polls the affected
//! resource (or the work request tracking it) until it reaches one of a set
//! of desired states, giving callers "create and wait until usable" semantics.
//!
//! - [`OperationWaiter`]: runs the initiating call and the poll loop
//! - [`WaiterConfig`]: interval ceiling and overall deadline
//! - [`DesiredStates`]: case-insensitive target states, optionally delete-like
//! - [`HasState`] / [`NotFound`]: capabilities the polled snapshot and its
//!   error type opt into
//! - [`WaitError`]: composite failure with partial results, timeout, cancellation
//!
//! ```no_run
//! use std::time::Duration;
//! use stratus_sdk_waiter::{Completion, DesiredStates, HasState, NotFound, OperationWaiter, WaiterConfig};
//!
//! #[derive(Debug)]
//! struct Group {
//!     id: String,
//!     lifecycle_state: String,
//! }
//!
//! impl HasState for Group {
//!     fn state(&self) -> Option<&str> {
//!         Some(&self.lifecycle_state)
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct ServiceError(u16);
//!
//! impl std::fmt::Display for ServiceError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "service returned {}", self.0)
//!     }
//! }
//!
//! impl std::error::Error for ServiceError {}
//!
//! impl NotFound for ServiceError {
//!     fn is_not_found(&self) -> bool {
//!         self.0 == 404
//!     }
//! }
//!
//! # async fn create_group() -> Result<Group, ServiceError> { unimplemented!() }
//! # async fn get_group(_id: String) -> Result<Group, ServiceError> { unimplemented!() }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let waiter = OperationWaiter::new(WaiterConfig::new(
//!     Duration::from_secs(5),
//!     Duration::from_secs(300),
//! )?);
//!
//! let completion = waiter
//!     .execute_and_wait(
//!         create_group(),
//!         |group| Some(group.id.clone()),
//!         get_group,
//!         &DesiredStates::new(["ACTIVE"]),
//!     )
//!     .await?;
//!
//! if let Completion::Reached(group) = completion {
//!     println!("{} is {}", group.id, group.lifecycle_state);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod state;
mod waiter;

pub use config::{WaiterConfig, WaiterConfigError, DEFAULT_MAX_INTERVAL, DEFAULT_MAX_WAIT};
pub use error::WaitError;
pub use state::{DesiredStates, HasState, NotFound};
pub use waiter::{Completion, OperationWaiter};

pub use tokio_util::sync::CancellationToken;
