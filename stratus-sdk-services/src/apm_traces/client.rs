//! Read-only APM trace explorer clients.

use stratus_sdk_common::{
    ApiClient, ApiRequest, ApiResult, ClientConfig, Method, Response, ServiceEndpoint,
};

use super::models::{
    AggregatedSnapshot, QueryDetails, QueryResultResponse, QueryWindow, QuickPick, Span, Trace,
};

pub const ENDPOINT: ServiceEndpoint = ServiceEndpoint {
    service: "apm-trace",
    api_version: "20200630",
};

/// Every trace call is scoped to an APM domain.
fn domain_scoped(request: ApiRequest, apm_domain_id: &str) -> ApiRequest {
    request.query("apmDomainId", Some(apm_domain_id))
}

/// Fetches traces, spans and snapshot data.
#[derive(Debug, Clone)]
pub struct TraceClient {
    api: ApiClient,
}

impl TraceClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self::from_api_client(ApiClient::new(config, &ENDPOINT)?))
    }

    pub fn from_api_client(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api
    }

    pub async fn get_trace(&self, apm_domain_id: &str, trace_key: &str) -> ApiResult<Response<Trace>> {
        let request = ApiRequest::new("GetTrace", Method::GET, "/traces/{traceKey}")
            .path_param("traceKey", trace_key)?;
        self.api.call(domain_scoped(request, apm_domain_id)).await
    }

    pub async fn get_span(
        &self,
        apm_domain_id: &str,
        span_key: &str,
        trace_key: &str,
    ) -> ApiResult<Response<Span>> {
        let request = ApiRequest::new("GetSpan", Method::GET, "/spans/{traceKey}/{spanKey}")
            .path_param("traceKey", trace_key)?
            .path_param("spanKey", span_key)?;
        self.api.call(domain_scoped(request, apm_domain_id)).await
    }

    pub async fn get_aggregated_snapshot(
        &self,
        apm_domain_id: &str,
        trace_key: &str,
    ) -> ApiResult<Response<AggregatedSnapshot>> {
        let request = ApiRequest::new(
            "GetAggregatedSnapshot",
            Method::GET,
            "/traces/{traceKey}/aggregatedSnapshotData",
        )
        .path_param("traceKey", trace_key)?;
        self.api.call(domain_scoped(request, apm_domain_id)).await
    }
}

/// Runs trace explorer queries.
#[derive(Debug, Clone)]
pub struct QueryClient {
    api: ApiClient,
}

impl QueryClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self::from_api_client(ApiClient::new(config, &ENDPOINT)?))
    }

    pub fn from_api_client(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api
    }

    pub async fn list_quick_picks(
        &self,
        apm_domain_id: &str,
        page: Option<&str>,
        limit: Option<u32>,
    ) -> ApiResult<Response<Vec<QuickPick>>> {
        let request = ApiRequest::new("ListQuickPicks", Method::GET, "/queries/quickPicks")
            .query("limit", limit)
            .query("page", page);
        self.api.call(domain_scoped(request, apm_domain_id)).await
    }

    pub async fn query(
        &self,
        apm_domain_id: &str,
        window: &QueryWindow,
        details: &QueryDetails,
    ) -> ApiResult<Response<QueryResultResponse>> {
        let request = ApiRequest::new("Query", Method::POST, "/queries/actions/runQuery")
            .query(
                "timeSpanStartedGreaterThanOrEqualTo",
                Some(window.time_span_started_greater_than_or_equal_to.to_rfc3339()),
            )
            .query(
                "timeSpanStartedLessThan",
                Some(window.time_span_started_less_than.to_rfc3339()),
            )
            .query("limit", window.limit)
            .query("page", window.page.as_ref())
            .json_body(details)?;
        self.api.call(domain_scoped(request, apm_domain_id)).await
    }
}
