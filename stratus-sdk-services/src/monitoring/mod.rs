//! Monitoring service: alarms and metrics.

mod client;
mod composite;
pub mod models;

pub use client::{MonitoringClient, ENDPOINT};
pub use composite::MonitoringClientCompositeOperations;
