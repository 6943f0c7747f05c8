//! Shared plumbing for Stratus SDK service clients:
//! - request assembly ([`ApiRequest`]) and the signing/retrying transport ([`ApiClient`])
//! - typed responses with header accessors ([`Response`])
//! - the error type every client returns ([`ApiError`])
//! - client configuration and endpoint resolution ([`ClientConfig`])
//! - model helpers ([`Model`], [`api_enum!`])
//!

mod client;
mod config;
mod error;
pub mod model;
mod request;
mod response;
mod retry;
mod signer;

pub use client::ApiClient;
pub use config::{ClientConfig, ServiceEndpoint, DEFAULT_DOMAIN, DEFAULT_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use model::{JsonValue, Model, UNKNOWN_ENUM_VALUE};
pub use request::ApiRequest;
pub use response::{
    Response, ETAG, IF_MATCH, OPC_NEXT_PAGE, OPC_REQUEST_ID, OPC_RETRY_TOKEN, OPC_WORK_REQUEST_ID,
};
pub use retry::{FixedRetry, NoRetry, RetryStrategy};
pub use signer::{AnonymousSigner, BearerTokenSigner, RequestSigner};

pub use reqwest::Method;

#[doc(hidden)]
pub mod __private {
    pub use log;
    pub use serde;
}
