//! APM trace, span and query models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratus_sdk_common::{api_enum, JsonValue, Model};

api_enum! {
    /// Role of a span in the call it records.
    pub enum SpanKind {
        Client => "CLIENT",
        Server => "SERVER",
        Producer => "PRODUCER",
        Consumer => "CONSUMER",
        Internal => "INTERNAL",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_name: String,
    pub tag_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanLog {
    pub log_key: String,
    pub log_value: String,
}

/// Log entries recorded on a span at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanLogCollection {
    pub time_created: DateTime<Utc>,
    #[serde(default)]
    pub span_logs: Vec<SpanLog>,
}

/// One timed unit of work within a trace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_span_key: Option<String>,
    pub trace_key: String,
    pub time_started: DateTime<Utc>,
    pub time_ended: DateTime<Utc>,
    pub duration_in_ms: i64,
    pub operation_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SpanKind>,
    pub is_error: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub logs: Vec<SpanLogCollection>,
}

impl Model for Span {}

impl Span {
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.tag_name == name)
            .map(|tag| tag.tag_value.as_str())
    }

    pub fn is_root(&self) -> bool {
        self.parent_span_key.is_none()
    }
}

/// A distributed trace and the spans it is made of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_span_operation_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_span_service_name: Option<String>,
    pub time_earliest_span_started: DateTime<Utc>,
    pub time_latest_span_ended: DateTime<Utc>,
    pub span_count: u32,
    pub error_span_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_span_duration_in_ms: Option<i64>,
    pub trace_duration_in_ms: i64,
    pub is_fault: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_error_code: Option<String>,
    #[serde(default)]
    pub spans: Vec<Span>,
}

impl Model for Trace {}

impl Trace {
    pub fn root_span(&self) -> Option<&Span> {
        self.spans.iter().find(|span| span.is_root())
    }

    pub fn error_spans(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(|span| span.is_error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
}

/// Aggregated snapshot data collected for the spans of a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSnapshot {
    #[serde(default)]
    pub details: Vec<SnapshotDetail>,
}

impl Model for AggregatedSnapshot {}

/// Canned query offered by the query explorer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPick {
    pub quick_pick_name: String,
    pub quick_pick_query: String,
}

impl Model for QuickPick {}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDetails {
    pub query_text: String,
}

impl Model for QueryDetails {}

/// Time window and paging for a query run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryWindow {
    pub time_span_started_greater_than_or_equal_to: DateTime<Utc>,
    pub time_span_started_less_than: DateTime<Utc>,
    pub limit: Option<u32>,
    pub page: Option<String>,
}

impl QueryWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            time_span_started_greater_than_or_equal_to: from,
            time_span_started_less_than: to,
            limit: None,
            page: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultRow {
    #[serde(default)]
    pub query_result_row_data: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub query_result_row_metadata: BTreeMap<String, JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultResponse {
    #[serde(default)]
    pub query_result_metadata: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub query_result_rows: Vec<QueryResultRow>,
}

impl Model for QueryResultResponse {}
