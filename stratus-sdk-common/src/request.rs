//! Request descriptor assembled by service clients.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::response::OPC_RETRY_TOKEN;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Method, path, query, headers and body of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    operation: &'static str,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// `path_template` uses `{name}` placeholders filled by [`ApiRequest::path_param`].
    pub fn new(operation: &'static str, method: Method, path_template: &str) -> Self {
        Self {
            operation,
            method,
            path: path_template.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Fill the `{name}` placeholder. Blank values are rejected before any
    /// request goes out.
    pub fn path_param(mut self, name: &str, value: &str) -> ApiResult<Self> {
        if value.trim().is_empty() {
            return Err(ApiError::invalid_parameter(format!(
                "{}: parameter {name} cannot be whitespace or an empty string",
                self.operation
            )));
        }
        let placeholder = format!("{{{name}}}");
        if !self.path.contains(&placeholder) {
            return Err(ApiError::invalid_parameter(format!(
                "{}: path has no parameter named {name}",
                self.operation
            )));
        }
        let encoded = utf8_percent_encode(value, PATH_SEGMENT).to_string();
        self.path = self.path.replace(&placeholder, &encoded);
        Ok(self)
    }

    /// Add a query parameter; `None` is skipped.
    pub fn query<V: ToString>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((name.to_string(), value.to_string()));
        }
        self
    }

    /// Add a header; `None` is skipped.
    pub fn header<V: ToString>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.headers.push((name.to_ascii_lowercase(), value.to_string()));
        }
        self
    }

    /// Attach an idempotency token unless the caller already supplied one.
    pub fn retry_token(self, token: Option<&str>) -> Self {
        if self.header_value(OPC_RETRY_TOKEN).is_some() {
            return self;
        }
        let token = token.map_or_else(|| uuid::Uuid::new_v4().simple().to_string(), str::to_owned);
        self.header(OPC_RETRY_TOKEN, Some(token))
    }

    pub fn json_body<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
