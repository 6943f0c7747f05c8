//! Error type shared by every service client.

use stratus_sdk_waiter::NotFound;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("{operation} failed with status {status} ({code}): {message}")]
    Service {
        operation: String,
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// The request never produced a response.
    #[error("Transport error calling {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Signing error: {0}")]
    Signing(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Service error code, e.g. `NotAuthorizedOrNotFound`.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Service { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }

    /// Throttling, server-side failures and connection problems.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service { status, .. } => *status == 429 || *status >= 500,
            Self::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            _ => false,
        }
    }
}

impl NotFound for ApiError {
    fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
