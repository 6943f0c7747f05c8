//! OS management operations that block until the group or work request settles.

use stratus_sdk_common::Response;
use stratus_sdk_waiter::{DesiredStates, OperationWaiter, WaiterConfig};

use super::client::OsManagementClient;
use super::models::{
    CreateManagedInstanceGroupDetails, ManagedInstanceGroup, UpdateManagedInstanceGroupDetails,
    WorkRequest,
};
use crate::CompositeResult;

#[derive(Debug, Clone)]
pub struct OsManagementClientCompositeOperations {
    client: OsManagementClient,
    waiter: OperationWaiter,
}

impl OsManagementClientCompositeOperations {
    pub fn new(client: OsManagementClient) -> Self {
        Self::with_waiter(client, OperationWaiter::default())
    }

    pub fn with_waiter(client: OsManagementClient, waiter: OperationWaiter) -> Self {
        Self { client, waiter }
    }

    pub fn with_waiter_config(&self, config: WaiterConfig) -> Self {
        Self::with_waiter(self.client.clone(), self.waiter.with_config(config))
    }

    pub fn client(&self) -> &OsManagementClient {
        &self.client
    }

    pub async fn create_managed_instance_group_and_wait_for_state(
        &self,
        details: &CreateManagedInstanceGroupDetails,
        desired: &DesiredStates,
    ) -> CompositeResult<Response<ManagedInstanceGroup>, Response<ManagedInstanceGroup>> {
        let client = &self.client;
        self.waiter
            .execute_and_wait(
                client.create_managed_instance_group(details, None),
                |created: &Response<ManagedInstanceGroup>| Some(created.data.id.clone()),
                |id| async move { client.get_managed_instance_group(&id).await },
                desired,
            )
            .await
    }

    pub async fn update_managed_instance_group_and_wait_for_state(
        &self,
        group_id: &str,
        details: &UpdateManagedInstanceGroupDetails,
        desired: &DesiredStates,
    ) -> CompositeResult<Response<ManagedInstanceGroup>, Response<ManagedInstanceGroup>> {
        let client = &self.client;
        self.waiter
            .execute_and_wait(
                client.update_managed_instance_group(group_id, details, None),
                |updated: &Response<ManagedInstanceGroup>| Some(updated.data.id.clone()),
                |id| async move { client.get_managed_instance_group(&id).await },
                desired,
            )
            .await
    }

    pub async fn delete_managed_instance_group_and_wait_for_state(
        &self,
        group_id: &str,
        desired: &DesiredStates,
    ) -> CompositeResult<Response<()>, Response<ManagedInstanceGroup>> {
        let client = &self.client;
        self.waiter
            .delete_and_wait(
                group_id,
                client.delete_managed_instance_group(group_id, None),
                |id| async move { client.get_managed_instance_group(&id).await },
                desired,
            )
            .await
    }

    /// Install a package and wait on the work request the install starts,
    /// typically for `SUCCEEDED` or `FAILED`.
    pub async fn install_package_on_managed_instance_and_wait_for_work_request(
        &self,
        managed_instance_id: &str,
        software_package_name: &str,
        desired: &DesiredStates,
    ) -> CompositeResult<Response<()>, Response<WorkRequest>> {
        let client = &self.client;
        self.waiter
            .execute_and_wait(
                client.install_package_on_managed_instance(
                    managed_instance_id,
                    software_package_name,
                ),
                |started: &Response<()>| started.work_request_id().map(str::to_owned),
                |id| async move { client.get_work_request(&id).await },
                desired,
            )
            .await
    }
}
