//! Client configuration and endpoint resolution.

use std::time::Duration;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Second-level domain every regional endpoint lives under.
pub const DEFAULT_DOMAIN: &str = "stratuscloud.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Identifies a service's host prefix and API version path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceEndpoint {
    pub service: &'static str,
    pub api_version: &'static str,
}

/// Settings shared by every client built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: String,
    /// Overrides the regional endpoint, e.g. for a private gateway or tests.
    pub endpoint: Option<Url>,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn for_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Base URL for `service`, including its API version segment.
    pub fn resolve_endpoint(&self, service: &ServiceEndpoint) -> ApiResult<Url> {
        let host = match &self.endpoint {
            Some(endpoint) => endpoint.as_str().trim_end_matches('/').to_string(),
            None => {
                let region = self.region.trim();
                if region.is_empty() {
                    return Err(ApiError::invalid_endpoint(
                        "a region or an explicit endpoint is required",
                    ));
                }
                format!("https://{}.{}.{}", service.service, region, DEFAULT_DOMAIN)
            }
        };

        Url::parse(&format!("{host}/{}", service.api_version)).map_err(|e| {
            ApiError::invalid_endpoint(format!("cannot build endpoint from '{host}': {e}"))
        })
    }

    pub(crate) fn user_agent(&self) -> String {
        let base = concat!("stratus-sdk-rust/", env!("CARGO_PKG_VERSION"));
        match &self.user_agent {
            Some(extra) => format!("{base} {extra}"),
            None => base.to_string(),
        }
    }
}
