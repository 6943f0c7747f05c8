//! Low-level API client shared by every service client.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::{ClientConfig, ServiceEndpoint};
use crate::error::{ApiError, ApiResult};
use crate::request::ApiRequest;
use crate::response::{Response, OPC_REQUEST_ID};
use crate::retry::{NoRetry, RetryStrategy};
use crate::signer::{AnonymousSigner, RequestSigner};

/// Error body returned by the services on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Sends [`ApiRequest`]s: signs each attempt, consults the retry strategy
/// after failures and decodes JSON bodies.
///
/// Cloning is cheap and clones share the connection pool, signer and retry
/// strategy, so one client can serve many concurrent composite operations.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    signer: Arc<dyn RequestSigner>,
    retry: Arc<dyn RetryStrategy>,
}

impl ApiClient {
    /// Build a client for `service` with anonymous signing and no retries.
    pub fn new(config: &ClientConfig, service: &ServiceEndpoint) -> ApiResult<Self> {
        let base_url = config.resolve_endpoint(service)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent())
            .build()
            .map_err(|source| ApiError::Transport {
                operation: "BuildHttpClient".to_string(),
                source,
            })?;

        log::debug!("Created {} client for {base_url}", service.service);

        Ok(Self {
            http,
            base_url,
            signer: Arc::new(AnonymousSigner),
            retry: Arc::new(NoRetry),
        })
    }

    pub fn with_signer(mut self, signer: impl RequestSigner + 'static) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    pub fn with_retry_strategy(mut self, retry: impl RetryStrategy + 'static) -> Self {
        self.retry = Arc::new(retry);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send `request` and decode the JSON body into `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<Response<T>> {
        let (status, headers, body) = self.execute(&request).await?;
        let data = serde_json::from_slice(&body).map_err(|e| {
            log::error!("Failed to decode {} response: {e}", request.operation());
            ApiError::Serialization(e)
        })?;
        Ok(Response::new(status, headers, data))
    }

    /// Send `request` and ignore whatever body comes back.
    pub async fn call_empty(&self, request: ApiRequest) -> ApiResult<Response<()>> {
        let (status, headers, _) = self.execute(&request).await?;
        Ok(Response::new(status, headers, ()))
    }

    async fn execute(&self, request: &ApiRequest) -> ApiResult<(StatusCode, HeaderMap, Vec<u8>)> {
        let url = self.url_for(request)?;
        let request_id = request
            .header_value(OPC_REQUEST_ID)
            .map_or_else(new_request_id, str::to_owned);

        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            let mut http_request = self.build(request, &url, &request_id)?;
            self.signer.sign(&mut http_request)?;

            log::debug!(
                "{} {} {url} (attempt {attempt}, {OPC_REQUEST_ID} {request_id})",
                request.operation(),
                request.method()
            );

            let outcome = match self.http.execute(http_request).await {
                Ok(response) => read_response(request.operation(), response).await,
                Err(source) => Err(ApiError::Transport {
                    operation: request.operation().to_string(),
                    source,
                }),
            };

            match outcome {
                Ok(success) => return Ok(success),
                Err(err) => match self.retry.next_delay(attempt, &err) {
                    Some(delay) => {
                        log::warn!(
                            "{} attempt {attempt} failed, retrying in {delay:?}: {err}",
                            request.operation()
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    fn url_for(&self, request: &ApiRequest) -> ApiResult<Url> {
        if request.path().contains('{') {
            return Err(ApiError::invalid_parameter(format!(
                "{}: unresolved path parameter in {}",
                request.operation(),
                request.path()
            )));
        }

        let raw = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path()
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::invalid_endpoint(format!("cannot parse '{raw}': {e}")))?;
        if !request.query_params().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query_params());
        }
        Ok(url)
    }

    fn build(&self, request: &ApiRequest, url: &Url, request_id: &str) -> ApiResult<reqwest::Request> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        insert_header(&mut headers, OPC_REQUEST_ID, request_id)?;
        for (name, value) in request.headers() {
            insert_header(&mut headers, name, value)?;
        }

        let mut builder = self
            .http
            .request(request.method().clone(), url.clone())
            .headers(headers);
        if let Some(body) = request.body() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        builder.build().map_err(|source| ApiError::Transport {
            operation: request.operation().to_string(),
            source,
        })
    }
}

async fn read_response(
    operation: &str,
    response: reqwest::Response,
) -> ApiResult<(StatusCode, HeaderMap, Vec<u8>)> {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .bytes()
        .await
        .map_err(|source| ApiError::Transport {
            operation: operation.to_string(),
            source,
        })?
        .to_vec();

    if status.is_success() {
        return Ok((status, headers, body));
    }

    let error_body: ServiceErrorBody = serde_json::from_slice(&body).unwrap_or_default();
    let request_id = headers
        .get(OPC_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    Err(ApiError::Service {
        operation: operation.to_string(),
        status: status.as_u16(),
        code: error_body
            .code
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string()),
        message: error_body.message.unwrap_or_default(),
        request_id,
    })
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) -> ApiResult<()> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| ApiError::invalid_parameter(format!("invalid header name '{name}': {e}")))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| ApiError::invalid_parameter(format!("invalid value for header {name}: {e}")))?;
    headers.insert(name, value);
    Ok(())
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string().to_uppercase()
}
