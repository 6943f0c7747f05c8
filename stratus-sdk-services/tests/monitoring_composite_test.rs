//! Alarm composite operations against a mock monitoring endpoint.

use std::time::Duration;

use serde_json::{json, Value};
use stratus_sdk_common::ClientConfig;
use stratus_sdk_services::monitoring::models::{
    AlarmLifecycleState, CreateAlarmDetails, ListAlarmsRequest, Severity, UpdateAlarmDetails,
};
use stratus_sdk_services::monitoring::{MonitoringClient, MonitoringClientCompositeOperations};
use stratus_sdk_waiter::{Completion, DesiredStates, OperationWaiter, WaitError, WaiterConfig};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALARM_ID: &str = "ocid1.alarm.oc1..a";
const ALARM_PATH: &str = "/20180401/alarms/ocid1.alarm.oc1..a";

fn alarm(state: &str) -> Value {
    json!({
        "id": ALARM_ID,
        "displayName": "High CPU",
        "compartmentId": "ocid1.compartment.oc1..c",
        "metricCompartmentId": "ocid1.compartment.oc1..c",
        "namespace": "oci_computeagent",
        "query": "CpuUtilization[1m].mean() > 90",
        "severity": "CRITICAL",
        "destinations": ["ocid1.onstopic.oc1..t"],
        "isEnabled": true,
        "lifecycleState": state,
        "timeCreated": "2024-03-01T10:00:00Z",
        "timeUpdated": "2024-03-01T10:00:00Z"
    })
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "code": "NotAuthorizedOrNotFound",
        "message": "Authorization failed or requested resource not found."
    }))
}

fn operations(server: &MockServer, max_wait: Duration) -> MonitoringClientCompositeOperations {
    let config =
        ClientConfig::for_region("us-ashburn-1").with_endpoint(Url::parse(&server.uri()).unwrap());
    let client = MonitoringClient::new(&config).unwrap();
    let waiter = OperationWaiter::new(WaiterConfig::new(Duration::from_millis(10), max_wait).unwrap());
    MonitoringClientCompositeOperations::with_waiter(client, waiter)
}

fn create_details() -> CreateAlarmDetails {
    CreateAlarmDetails {
        display_name: "High CPU".to_string(),
        compartment_id: "ocid1.compartment.oc1..c".to_string(),
        metric_compartment_id: "ocid1.compartment.oc1..c".to_string(),
        metric_compartment_id_in_subtree: None,
        namespace: "oci_computeagent".to_string(),
        resource_group: None,
        query: "CpuUtilization[1m].mean() > 90".to_string(),
        resolution: None,
        pending_duration: Some("PT5M".to_string()),
        severity: Severity::Critical,
        body: None,
        message_format: None,
        destinations: vec!["ocid1.onstopic.oc1..t".to_string()],
        repeat_notification_duration: None,
        suppression: None,
        is_enabled: true,
        freeform_tags: None,
        defined_tags: None,
    }
}

#[tokio::test]
async fn test_create_alarm_waits_for_active() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/20180401/alarms"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({"displayName": "High CPU", "severity": "CRITICAL"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("DELETING")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("ACTIVE")))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = operations(&server, Duration::from_secs(5))
        .create_alarm_and_wait_for_state(&create_details(), &DesiredStates::new(["ACTIVE"]))
        .await
        .unwrap();

    let snapshot = outcome.into_snapshot().unwrap();
    assert_eq!(snapshot.data.lifecycle_state, AlarmLifecycleState::Active);
}

#[tokio::test]
async fn test_create_alarm_without_desired_states_skips_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("ACTIVE")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("ACTIVE")))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = operations(&server, Duration::from_secs(5))
        .create_alarm_and_wait_for_state(&create_details(), &DesiredStates::none())
        .await
        .unwrap();

    assert!(matches!(outcome, Completion::Initiated(ref created) if created.data.id == ALARM_ID));
}

#[tokio::test]
async fn test_update_alarm_times_out_with_partial_result() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(ALARM_PATH))
        .and(body_partial_json(json!({"isEnabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("DELETING")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("DELETING")))
        .mount(&server)
        .await;

    let details = UpdateAlarmDetails {
        is_enabled: Some(false),
        ..UpdateAlarmDetails::default()
    };
    let err = operations(&server, Duration::from_millis(50))
        .update_alarm_and_wait_for_state(ALARM_ID, &details, &DesiredStates::new(["ACTIVE"]))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.partial_results().len(), 1);
    assert_eq!(err.partial_results()[0].data.id, ALARM_ID);
    assert_eq!(
        err.last_snapshot().map(|s| s.data.lifecycle_state),
        Some(AlarmLifecycleState::Deleting)
    );
}

#[tokio::test]
async fn test_delete_alarm_succeeds_when_alarm_disappears() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("ACTIVE")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ALARM_PATH))
        .respond_with(not_found())
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-request-id", "REQ-DEL"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = operations(&server, Duration::from_secs(5))
        .delete_alarm_and_wait_for_state(ALARM_ID, &DesiredStates::new(["DELETED"]))
        .await
        .unwrap();

    match outcome {
        Completion::Deleted(Some(deleted)) => assert_eq!(deleted.request_id(), Some("REQ-DEL")),
        other => panic!("expected deletion, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_alarm_reaching_deleted_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("ACTIVE")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(alarm("DELETED")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let outcome = operations(&server, Duration::from_secs(5))
        .delete_alarm_and_wait_for_state(ALARM_ID, &DesiredStates::new(["deleted"]))
        .await
        .unwrap();

    assert_eq!(
        outcome.snapshot().map(|s| s.data.lifecycle_state),
        Some(AlarmLifecycleState::Deleted)
    );
}

#[tokio::test]
async fn test_delete_alarm_without_desired_states_skips_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(not_found())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(ALARM_PATH))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-request-id", "REQ-DEL"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = operations(&server, Duration::from_secs(5))
        .delete_alarm_and_wait_for_state(ALARM_ID, &DesiredStates::none())
        .await
        .unwrap();

    match outcome {
        Completion::Initiated(deleted) => assert_eq!(deleted.request_id(), Some("REQ-DEL")),
        other => panic!("expected the delete response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_of_missing_alarm_is_composite_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ALARM_PATH))
        .respond_with(not_found())
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = operations(&server, Duration::from_secs(5))
        .delete_alarm_and_wait_for_state(ALARM_ID, &DesiredStates::new(["DELETED"]))
        .await
        .unwrap_err();

    match err {
        WaitError::Composite {
            partial_results,
            source,
        } => {
            assert!(partial_results.is_empty());
            assert_eq!(source.status(), Some(404));
        }
        other => panic!("expected composite error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_alarms_sends_filters_and_reads_next_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/20180401/alarms"))
        .and(query_param("compartmentId", "ocid1.compartment.oc1..c"))
        .and(query_param("lifecycleState", "ACTIVE"))
        .and(query_param("limit", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("opc-next-page", "page-2")
                .set_body_json(json!([alarm("ACTIVE")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let filter = ListAlarmsRequest {
        lifecycle_state: Some(AlarmLifecycleState::Active),
        limit: Some(10),
        ..ListAlarmsRequest::new("ocid1.compartment.oc1..c")
    };
    let response = operations(&server, Duration::from_secs(5))
        .client()
        .list_alarms(&filter)
        .await
        .unwrap();

    assert_eq!(response.next_page(), Some("page-2"));
    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].severity, Severity::Critical);
}
