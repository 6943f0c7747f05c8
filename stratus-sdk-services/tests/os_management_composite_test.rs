//! Managed instance group and work-request waits against a mock endpoint.

use std::time::Duration;

use serde_json::{json, Value};
use stratus_sdk_common::ClientConfig;
use stratus_sdk_services::os_management::models::{
    CreateManagedInstanceGroupDetails, LifecycleState, OsFamily, UpdateManagedInstanceGroupDetails,
    WorkRequestStatus,
};
use stratus_sdk_services::os_management::{
    OsManagementClient, OsManagementClientCompositeOperations,
};
use stratus_sdk_waiter::{Completion, DesiredStates, OperationWaiter, WaitError, WaiterConfig};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP_ID: &str = "ocid1.mig.oc1..g";
const GROUP_PATH: &str = "/20190801/managedInstanceGroups/ocid1.mig.oc1..g";
const INSTANCE_ID: &str = "ocid1.instance.oc1..i";
const INSTALL_PATH: &str =
    "/20190801/managedInstances/ocid1.instance.oc1..i/actions/packages/install";
const WORK_REQUEST_PATH: &str = "/20190801/workRequests/ocid1.wr.oc1..w";

fn group(state: &str) -> Value {
    json!({
        "id": GROUP_ID,
        "displayName": "web",
        "compartmentId": "ocid1.compartment.oc1..c",
        "osFamily": "LINUX",
        "lifecycleState": state
    })
}

fn work_request(status: &str) -> Value {
    json!({
        "id": "ocid1.wr.oc1..w",
        "operationType": "INSTALL",
        "status": status,
        "compartmentId": "ocid1.compartment.oc1..c",
        "timeAccepted": "2024-03-01T10:00:00Z"
    })
}

fn operations(server: &MockServer, max_wait: Duration) -> OsManagementClientCompositeOperations {
    let config =
        ClientConfig::for_region("us-phoenix-1").with_endpoint(Url::parse(&server.uri()).unwrap());
    let client = OsManagementClient::new(&config).unwrap();
    let waiter = OperationWaiter::new(WaiterConfig::new(Duration::from_millis(10), max_wait).unwrap());
    OsManagementClientCompositeOperations::with_waiter(client, waiter)
}

#[tokio::test]
async fn test_create_group_polls_until_active() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/20190801/managedInstanceGroups"))
        .and(body_json(json!({
            "displayName": "web",
            "compartmentId": "ocid1.compartment.oc1..c",
            "osFamily": "LINUX"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(group("CREATING")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group("CREATING")))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group("ACTIVE")))
        .expect(1)
        .mount(&server)
        .await;

    let details = CreateManagedInstanceGroupDetails {
        display_name: "web".to_string(),
        compartment_id: "ocid1.compartment.oc1..c".to_string(),
        description: None,
        os_family: Some(OsFamily::Linux),
        freeform_tags: None,
        defined_tags: None,
    };
    let outcome = operations(&server, Duration::from_secs(5))
        .create_managed_instance_group_and_wait_for_state(
            &details,
            &DesiredStates::new(["ACTIVE", "FAILED"]),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome.snapshot().and_then(|s| s.data.lifecycle_state),
        Some(LifecycleState::Active)
    );
}

#[tokio::test]
async fn test_update_group_failure_is_composite_error_without_polling() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "Conflict",
            "message": "group is being updated"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(group("ACTIVE")))
        .expect(0)
        .mount(&server)
        .await;

    let details = UpdateManagedInstanceGroupDetails {
        description: Some("frontend".to_string()),
        ..UpdateManagedInstanceGroupDetails::default()
    };
    let err = operations(&server, Duration::from_secs(5))
        .update_managed_instance_group_and_wait_for_state(
            GROUP_ID,
            &details,
            &DesiredStates::new(["ACTIVE"]),
        )
        .await
        .unwrap_err();

    assert!(err.partial_results().is_empty());
    assert_eq!(err.cause().and_then(|e| e.code()), Some("Conflict"));
}

#[tokio::test]
async fn test_delete_group_treats_not_found_as_deleted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group("ACTIVE")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(group("DELETING")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = operations(&server, Duration::from_secs(5))
        .delete_managed_instance_group_and_wait_for_state(
            GROUP_ID,
            &DesiredStates::new(["DELETED"]),
        )
        .await
        .unwrap();

    assert!(outcome.is_deleted());
}

#[tokio::test]
async fn test_install_package_waits_on_work_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INSTALL_PATH))
        .and(query_param("softwarePackageName", "nginx-1.20.1"))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-work-request-id", "ocid1.wr.oc1..w"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(WORK_REQUEST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_request("IN_PROGRESS")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(WORK_REQUEST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_request("SUCCEEDED")))
        .mount(&server)
        .await;

    let outcome = operations(&server, Duration::from_secs(5))
        .install_package_on_managed_instance_and_wait_for_work_request(
            INSTANCE_ID,
            "nginx-1.20.1",
            &DesiredStates::new(["SUCCEEDED", "FAILED"]),
        )
        .await
        .unwrap();

    match outcome {
        Completion::Reached(snapshot) => {
            assert_eq!(snapshot.data.status, WorkRequestStatus::Succeeded);
        }
        other => panic!("expected a reached work request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_install_without_work_request_header_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(INSTALL_PATH))
        .respond_with(ResponseTemplate::new(204).insert_header("opc-request-id", "REQ-1"))
        .mount(&server)
        .await;

    let err = operations(&server, Duration::from_secs(5))
        .install_package_on_managed_instance_and_wait_for_work_request(
            INSTANCE_ID,
            "nginx-1.20.1",
            &DesiredStates::new(["SUCCEEDED"]),
        )
        .await
        .unwrap_err();

    match err {
        WaitError::MissingPollTarget { partial_results } => {
            assert_eq!(partial_results[0].request_id(), Some("REQ-1"));
        }
        other => panic!("expected missing poll target, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_package_name_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = operations(&server, Duration::from_secs(5))
        .install_package_on_managed_instance_and_wait_for_work_request(
            INSTANCE_ID,
            "  ",
            &DesiredStates::new(["SUCCEEDED"]),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err.cause(),
        Some(stratus_sdk_common::ApiError::InvalidParameter(_))
    ));
}
