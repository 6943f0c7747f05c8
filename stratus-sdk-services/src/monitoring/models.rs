//! Monitoring resource and request models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratus_sdk_common::{api_enum, JsonValue, Model};
use stratus_sdk_waiter::HasState;

/// Defined tags keyed by namespace, then by tag key.
pub type DefinedTags = BTreeMap<String, BTreeMap<String, JsonValue>>;

api_enum! {
    /// Lifecycle of an alarm definition.
    pub enum AlarmLifecycleState {
        Active => "ACTIVE",
        Deleting => "DELETING",
        Deleted => "DELETED",
    }
}

api_enum! {
    /// Perceived severity of the condition an alarm tracks.
    pub enum Severity {
        Critical => "CRITICAL",
        Error => "ERROR",
        Warning => "WARNING",
        Info => "INFO",
    }
}

api_enum! {
    /// Formatting applied to notification messages.
    pub enum MessageFormat {
        Raw => "RAW",
        PrettyJson => "PRETTY_JSON",
        OnsOptimized => "ONS_OPTIMIZED",
    }
}

api_enum! {
    /// Whether one bad metric record rejects the whole posted batch.
    pub enum BatchAtomicity {
        Atomic => "ATOMIC",
        NonAtomic => "NON_ATOMIC",
    }
}

api_enum! {
    pub enum AlarmSortBy {
        DisplayName => "displayName",
        Severity => "severity",
    }
}

api_enum! {
    pub enum SortOrder {
        Asc => "ASC",
        Desc => "DESC",
    }
}

/// Window during which an alarm sends no notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suppression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub time_suppress_from: DateTime<Utc>,
    pub time_suppress_until: DateTime<Utc>,
}

/// An alarm definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: String,
    pub display_name: String,
    pub compartment_id: String,
    pub metric_compartment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_compartment_id_in_subtree: Option<bool>,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// ISO 8601 duration the condition must hold before firing, e.g. `PT5M`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_duration: Option<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_notifications_per_metric_dimension_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_format: Option<MessageFormat>,
    pub destinations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_notification_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppression: Option<Suppression>,
    pub is_enabled: bool,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub defined_tags: DefinedTags,
    pub lifecycle_state: AlarmLifecycleState,
    pub time_created: DateTime<Utc>,
    pub time_updated: DateTime<Utc>,
}

impl Model for Alarm {}

impl HasState for Alarm {
    fn state(&self) -> Option<&str> {
        Some(self.lifecycle_state.as_str())
    }
}

/// Alarm as returned by the list operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmSummary {
    pub id: String,
    pub display_name: String,
    pub compartment_id: String,
    pub metric_compartment_id: String,
    pub namespace: String,
    pub query: String,
    pub severity: Severity,
    pub destinations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppression: Option<Suppression>,
    pub is_enabled: bool,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub defined_tags: DefinedTags,
    pub lifecycle_state: AlarmLifecycleState,
}

impl Model for AlarmSummary {}

impl HasState for AlarmSummary {
    fn state(&self) -> Option<&str> {
        Some(self.lifecycle_state.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlarmDetails {
    pub display_name: String,
    pub compartment_id: String,
    pub metric_compartment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_compartment_id_in_subtree: Option<bool>,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_duration: Option<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_format: Option<MessageFormat>,
    pub destinations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_notification_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppression: Option<Suppression>,
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for CreateAlarmDetails {}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlarmDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compartment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_compartment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_format: Option<MessageFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_notification_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppression: Option<Suppression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for UpdateAlarmDetails {}

/// Filters for listing alarms in a compartment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListAlarmsRequest {
    pub compartment_id: String,
    pub display_name: Option<String>,
    pub lifecycle_state: Option<AlarmLifecycleState>,
    pub compartment_id_in_subtree: Option<bool>,
    pub sort_by: Option<AlarmSortBy>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub page: Option<String>,
}

impl ListAlarmsRequest {
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
}

/// One metric stream and its raw datapoints, as posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDataDetails {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    pub compartment_id: String,
    pub name: String,
    pub dimensions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    pub datapoints: Vec<Datapoint>,
}

impl Model for MetricDataDetails {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetricDataDetails {
    pub metric_data: Vec<MetricDataDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_atomicity: Option<BatchAtomicity>,
}

impl Model for PostMetricDataDetails {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedMetricRecord {
    pub message: String,
    pub metric_data: MetricDataDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetricDataResponseDetails {
    pub failed_metrics_count: i32,
    #[serde(default)]
    pub failed_metrics: Vec<FailedMetricRecord>,
}

impl Model for PostMetricDataResponseDetails {}

/// Metric query in the monitoring query language, e.g. `CpuUtilization[1m].mean()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeMetricsDataDetails {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl Model for SummarizeMetricsDataDetails {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDatapoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One aggregated metric stream returned by a summarize query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricData {
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    pub compartment_id: String,
    pub name: String,
    pub dimensions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    pub aggregated_datapoints: Vec<AggregatedDatapoint>,
}

impl Model for MetricData {}

// Stateless: a wait on metric data can only end by timeout.
impl HasState for MetricData {}
