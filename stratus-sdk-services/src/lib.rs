//! Typed clients for the Stratus APM traces, OS management and monitoring
//! services.
//!
//! Each service module exposes a client, its resource models and, for
//! services with mutating calls, a `*CompositeOperations` wrapper that issues
//! the call and then waits for the affected resource or work request to
//! settle.
//!
//! ```no_run
//! use stratus_sdk_common::ClientConfig;
//! use stratus_sdk_services::monitoring::{MonitoringClient, MonitoringClientCompositeOperations};
//! use stratus_sdk_waiter::DesiredStates;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MonitoringClient::new(&ClientConfig::for_region("us-ashburn-1"))?;
//! let ops = MonitoringClientCompositeOperations::new(client);
//! let outcome = ops
//!     .delete_alarm_and_wait_for_state("ocid1.alarm.oc1..a", &DesiredStates::new(["DELETED"]))
//!     .await;
//! println!("deleted: {}", outcome.map(|c| c.is_deleted()).unwrap_or(false));
//! # Ok(())
//! # }
//! ```

pub mod apm_traces;
pub mod monitoring;
pub mod os_management;

use stratus_sdk_common::ApiError;
use stratus_sdk_waiter::{Completion, WaitError};

/// Outcome of a composite operation: `I` is the initiating call's response,
/// `S` the polled snapshot.
pub type CompositeResult<I, S> = Result<Completion<I, S>, WaitError<I, S, ApiError>>;
