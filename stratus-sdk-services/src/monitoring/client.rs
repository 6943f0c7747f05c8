//! Monitoring API client: alarm definitions plus metric ingestion and queries.

use stratus_sdk_common::{
    ApiClient, ApiRequest, ApiResult, ClientConfig, Method, Response, ServiceEndpoint, IF_MATCH,
};

use super::models::{
    Alarm, AlarmSummary, CreateAlarmDetails, ListAlarmsRequest, MetricData,
    PostMetricDataDetails, PostMetricDataResponseDetails, SummarizeMetricsDataDetails,
    UpdateAlarmDetails,
};

pub const ENDPOINT: ServiceEndpoint = ServiceEndpoint {
    service: "telemetry",
    api_version: "20180401",
};

#[derive(Debug, Clone)]
pub struct MonitoringClient {
    api: ApiClient,
}

impl MonitoringClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self::from_api_client(ApiClient::new(config, &ENDPOINT)?))
    }

    /// Wrap a transport that already carries a signer or retry strategy.
    pub fn from_api_client(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api
    }

    pub async fn create_alarm(
        &self,
        details: &CreateAlarmDetails,
        retry_token: Option<&str>,
    ) -> ApiResult<Response<Alarm>> {
        let request = ApiRequest::new("CreateAlarm", Method::POST, "/alarms")
            .retry_token(retry_token)
            .json_body(details)?;
        self.api.call(request).await
    }

    pub async fn get_alarm(&self, alarm_id: &str) -> ApiResult<Response<Alarm>> {
        let request = ApiRequest::new("GetAlarm", Method::GET, "/alarms/{alarmId}")
            .path_param("alarmId", alarm_id)?;
        self.api.call(request).await
    }

    /// Update an alarm; `if_match` guards against concurrent edits using the
    /// etag of an earlier read.
    pub async fn update_alarm(
        &self,
        alarm_id: &str,
        details: &UpdateAlarmDetails,
        if_match: Option<&str>,
    ) -> ApiResult<Response<Alarm>> {
        let request = ApiRequest::new("UpdateAlarm", Method::PUT, "/alarms/{alarmId}")
            .path_param("alarmId", alarm_id)?
            .header(IF_MATCH, if_match)
            .json_body(details)?;
        self.api.call(request).await
    }

    pub async fn delete_alarm(
        &self,
        alarm_id: &str,
        if_match: Option<&str>,
    ) -> ApiResult<Response<()>> {
        let request = ApiRequest::new("DeleteAlarm", Method::DELETE, "/alarms/{alarmId}")
            .path_param("alarmId", alarm_id)?
            .header(IF_MATCH, if_match);
        self.api.call_empty(request).await
    }

    /// One page of alarms; follow `Response::next_page` for the rest.
    pub async fn list_alarms(
        &self,
        filter: &ListAlarmsRequest,
    ) -> ApiResult<Response<Vec<AlarmSummary>>> {
        let request = ApiRequest::new("ListAlarms", Method::GET, "/alarms")
            .query("compartmentId", Some(&filter.compartment_id))
            .query("displayName", filter.display_name.as_ref())
            .query("lifecycleState", filter.lifecycle_state)
            .query("compartmentIdInSubtree", filter.compartment_id_in_subtree)
            .query("sortBy", filter.sort_by)
            .query("sortOrder", filter.sort_order)
            .query("limit", filter.limit)
            .query("page", filter.page.as_ref());
        self.api.call(request).await
    }

    pub async fn post_metric_data(
        &self,
        details: &PostMetricDataDetails,
    ) -> ApiResult<Response<PostMetricDataResponseDetails>> {
        let request =
            ApiRequest::new("PostMetricData", Method::POST, "/metrics").json_body(details)?;
        self.api.call(request).await
    }

    pub async fn summarize_metrics_data(
        &self,
        compartment_id: &str,
        compartment_id_in_subtree: Option<bool>,
        details: &SummarizeMetricsDataDetails,
    ) -> ApiResult<Response<Vec<MetricData>>> {
        let request = ApiRequest::new(
            "SummarizeMetricsData",
            Method::POST,
            "/metrics/actions/summarizeMetricsData",
        )
        .query("compartmentId", Some(compartment_id))
        .query("compartmentIdInSubtree", compartment_id_in_subtree)
        .json_body(details)?;
        self.api.call(request).await
    }
}
