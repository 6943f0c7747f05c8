//! Decoded API responses.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use stratus_sdk_waiter::HasState;

pub const OPC_REQUEST_ID: &str = "opc-request-id";
pub const OPC_WORK_REQUEST_ID: &str = "opc-work-request-id";
pub const OPC_NEXT_PAGE: &str = "opc-next-page";
pub const OPC_RETRY_TOKEN: &str = "opc-retry-token";
pub const ETAG: &str = "etag";
pub const IF_MATCH: &str = "if-match";

/// Status, headers and typed body of a successful call.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl<T> Response<T> {
    pub fn new(status: StatusCode, headers: HeaderMap, data: T) -> Self {
        Self {
            status,
            headers,
            data,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(OPC_REQUEST_ID)
    }

    /// Out-of-band handle for the long-running operation this call started.
    pub fn work_request_id(&self) -> Option<&str> {
        self.header(OPC_WORK_REQUEST_ID)
    }

    pub fn next_page(&self) -> Option<&str> {
        self.header(OPC_NEXT_PAGE)
    }

    pub fn etag(&self) -> Option<&str> {
        self.header(ETAG)
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            headers: self.headers,
            data: f(self.data),
        }
    }
}

impl<T: HasState> HasState for Response<T> {
    fn state(&self) -> Option<&str> {
        self.data.state()
    }
}
