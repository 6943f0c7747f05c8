//! Request signing seam.
//!
//! Signing schemes live outside this crate; the transport only calls
//! [`RequestSigner::sign`] on every attempt right before it is sent.

use std::fmt;

use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::error::{ApiError, ApiResult};

pub trait RequestSigner: Send + Sync + fmt::Debug {
    fn sign(&self, request: &mut reqwest::Request) -> ApiResult<()>;
}

/// Leaves requests untouched. Suitable for public endpoints and local gateways.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSigner;

impl RequestSigner for AnonymousSigner {
    fn sign(&self, _request: &mut reqwest::Request) -> ApiResult<()> {
        Ok(())
    }
}

/// Sets `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerTokenSigner {
    token: String,
}

impl BearerTokenSigner {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for BearerTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenSigner")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl RequestSigner for BearerTokenSigner {
    fn sign(&self, request: &mut reqwest::Request) -> ApiResult<()> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| ApiError::Signing(format!("Token is not a valid header value: {e}")))?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}
