//! OS management service: managed instance groups, package installs and the
//! work requests they start.

mod client;
mod composite;
pub mod models;

pub use client::{OsManagementClient, ENDPOINT};
pub use composite::OsManagementClientCompositeOperations;
