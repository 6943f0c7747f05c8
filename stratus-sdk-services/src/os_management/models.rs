//! OS management resource and request models.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratus_sdk_common::{api_enum, JsonValue, Model};
use stratus_sdk_waiter::HasState;

pub type DefinedTags = BTreeMap<String, BTreeMap<String, JsonValue>>;

api_enum! {
    pub enum LifecycleState {
        Creating => "CREATING",
        Updating => "UPDATING",
        Active => "ACTIVE",
        Deleting => "DELETING",
        Deleted => "DELETED",
        Failed => "FAILED",
    }
}

api_enum! {
    pub enum OsFamily {
        Linux => "LINUX",
        Windows => "WINDOWS",
        All => "ALL",
    }
}

api_enum! {
    /// Progress of an asynchronous work request.
    pub enum WorkRequestStatus {
        Accepted => "ACCEPTED",
        InProgress => "IN_PROGRESS",
        Failed => "FAILED",
        Succeeded => "SUCCEEDED",
        Canceling => "CANCELING",
        Canceled => "CANCELED",
    }
}

api_enum! {
    pub enum WorkRequestOperationType {
        Install => "INSTALL",
        Update => "UPDATE",
        Remove => "REMOVE",
        UpdateAll => "UPDATEALL",
        EnableModuleStream => "ENABLEMODULESTREAM",
        DisableModuleStream => "DISABLEMODULESTREAM",
    }
}

api_enum! {
    /// How a work request touched one of its resources.
    pub enum ActionType {
        Created => "CREATED",
        Updated => "UPDATED",
        Deleted => "DELETED",
        Related => "RELATED",
        InProgress => "IN_PROGRESS",
        Failed => "FAILED",
    }
}

api_enum! {
    pub enum ManagedInstanceGroupSortBy {
        TimeCreated => "TIMECREATED",
        DisplayName => "DISPLAYNAME",
    }
}

api_enum! {
    pub enum SortOrder {
        Asc => "ASC",
        Desc => "DESC",
    }
}

/// Reference to another resource by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Named set of managed instances administered together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedInstanceGroup {
    pub id: String,
    pub display_name: String,
    pub compartment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_instance_count: Option<u32>,
    #[serde(default)]
    pub managed_instances: Vec<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_family: Option<OsFamily>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub defined_tags: DefinedTags,
}

impl Model for ManagedInstanceGroup {}

impl HasState for ManagedInstanceGroup {
    fn state(&self) -> Option<&str> {
        self.lifecycle_state.map(LifecycleState::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedInstanceGroupSummary {
    pub id: String,
    pub display_name: String,
    pub compartment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_instance_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_state: Option<LifecycleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_family: Option<OsFamily>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
    #[serde(default)]
    pub defined_tags: DefinedTags,
}

impl Model for ManagedInstanceGroupSummary {}

impl HasState for ManagedInstanceGroupSummary {
    fn state(&self) -> Option<&str> {
        self.lifecycle_state.map(LifecycleState::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagedInstanceGroupDetails {
    pub display_name: String,
    pub compartment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_family: Option<OsFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for CreateManagedInstanceGroupDetails {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManagedInstanceGroupDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_tags: Option<DefinedTags>,
}

impl Model for UpdateManagedInstanceGroupDetails {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListManagedInstanceGroupsRequest {
    pub compartment_id: String,
    pub display_name: Option<String>,
    pub lifecycle_state: Option<LifecycleState>,
    pub os_family: Option<OsFamily>,
    pub sort_by: Option<ManagedInstanceGroupSortBy>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub page: Option<String>,
}

impl ListManagedInstanceGroupsRequest {
    pub fn new(compartment_id: impl Into<String>) -> Self {
        Self {
            compartment_id: compartment_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequestResource {
    pub entity_type: String,
    pub action_type: ActionType,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_uri: Option<String>,
}

/// Asynchronous job started by a package or module operation.
///
/// Equality and hashing compare `percent_complete` by bit pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub id: String,
    pub operation_type: WorkRequestOperationType,
    pub status: WorkRequestStatus,
    pub compartment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub resources: Vec<WorkRequestResource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
    pub time_accepted: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_finished: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_family: Option<OsFamily>,
}

impl PartialEq for WorkRequest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.operation_type == other.operation_type
            && self.status == other.status
            && self.compartment_id == other.compartment_id
            && self.description == other.description
            && self.message == other.message
            && self.resources == other.resources
            && self.percent_complete.map(f32::to_bits) == other.percent_complete.map(f32::to_bits)
            && self.time_accepted == other.time_accepted
            && self.time_started == other.time_started
            && self.time_finished == other.time_finished
            && self.os_family == other.os_family
    }
}

impl Eq for WorkRequest {}

impl Hash for WorkRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let Self {
            id,
            operation_type,
            status,
            compartment_id,
            description,
            message,
            resources,
            percent_complete,
            time_accepted,
            time_started,
            time_finished,
            os_family,
        } = self;
        id.hash(state);
        operation_type.hash(state);
        status.hash(state);
        compartment_id.hash(state);
        description.hash(state);
        message.hash(state);
        resources.hash(state);
        percent_complete.map(f32::to_bits).hash(state);
        time_accepted.hash(state);
        time_started.hash(state);
        time_finished.hash(state);
        os_family.hash(state);
    }
}

impl Model for WorkRequest {}

// Work requests report progress through `status`, not a lifecycle state.
impl HasState for WorkRequest {
    fn state(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use serde_json::json;

    #[test]
    fn test_group_without_lifecycle_state_has_no_state() {
        let group: ManagedInstanceGroup = serde_json::from_value(json!({
            "id": "ocid1.mig.oc1..g",
            "displayName": "web",
            "compartmentId": "ocid1.compartment.oc1..c"
        }))
        .unwrap();
        assert_eq!(group.state(), None);
        assert!(group.managed_instances.is_empty());
    }

    #[test]
    fn test_work_request_state_is_status() {
        let work_request: WorkRequest = serde_json::from_value(json!({
            "id": "ocid1.wr.oc1..w",
            "operationType": "INSTALL",
            "status": "IN_PROGRESS",
            "compartmentId": "ocid1.compartment.oc1..c",
            "percentComplete": 40.0,
            "timeAccepted": "2024-03-01T10:00:00Z",
            "resources": [{
                "entityType": "managedInstance",
                "actionType": "IN_PROGRESS",
                "identifier": "ocid1.instance.oc1..i"
            }]
        }))
        .unwrap();
        assert_eq!(work_request.state(), Some("IN_PROGRESS"));
        assert_eq!(work_request.resources[0].action_type, ActionType::InProgress);
    }

    #[test]
    fn test_equal_work_requests_collapse_in_a_set() {
        let body = json!({
            "id": "ocid1.wr.oc1..w",
            "operationType": "INSTALL",
            "status": "IN_PROGRESS",
            "compartmentId": "ocid1.compartment.oc1..c",
            "percentComplete": 40.0,
            "timeAccepted": "2024-03-01T10:00:00Z"
        });
        let first: WorkRequest = serde_json::from_value(body.clone()).unwrap();
        let second: WorkRequest = serde_json::from_value(body).unwrap();
        let mut done = second.clone();
        done.percent_complete = Some(100.0);

        let seen: HashSet<_> = [first, second, done].into_iter().collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_create_details_skip_unset_fields() {
        let details = CreateManagedInstanceGroupDetails {
            display_name: "web".to_string(),
            compartment_id: "ocid1.compartment.oc1..c".to_string(),
            description: None,
            os_family: Some(OsFamily::Linux),
            freeform_tags: None,
            defined_tags: None,
        };
        assert_eq!(
            details.to_map().unwrap(),
            json!({
                "displayName": "web",
                "compartmentId": "ocid1.compartment.oc1..c",
                "osFamily": "LINUX"
            })
            .as_object()
            .unwrap()
            .clone()
        );
    }
}
