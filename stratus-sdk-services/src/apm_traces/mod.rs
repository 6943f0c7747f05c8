//! APM traces service: trace, span and snapshot lookups plus trace queries.

mod client;
pub mod models;

pub use client::{QueryClient, TraceClient, ENDPOINT};
