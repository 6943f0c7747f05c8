//! Alarm operations that block until the alarm settles.

use stratus_sdk_common::Response;
use stratus_sdk_waiter::{DesiredStates, OperationWaiter, WaiterConfig};

use super::client::MonitoringClient;
use super::models::{Alarm, CreateAlarmDetails, UpdateAlarmDetails};
use crate::CompositeResult;

#[derive(Debug, Clone)]
pub struct MonitoringClientCompositeOperations {
    client: MonitoringClient,
    waiter: OperationWaiter,
}

impl MonitoringClientCompositeOperations {
    pub fn new(client: MonitoringClient) -> Self {
        Self::with_waiter(client, OperationWaiter::default())
    }

    pub fn with_waiter(client: MonitoringClient, waiter: OperationWaiter) -> Self {
        Self { client, waiter }
    }

    /// Copy of these operations that waits with `config` instead.
    pub fn with_waiter_config(&self, config: WaiterConfig) -> Self {
        Self::with_waiter(self.client.clone(), self.waiter.with_config(config))
    }

    pub fn client(&self) -> &MonitoringClient {
        &self.client
    }

    pub async fn create_alarm_and_wait_for_state(
        &self,
        details: &CreateAlarmDetails,
        desired: &DesiredStates,
    ) -> CompositeResult<Response<Alarm>, Response<Alarm>> {
        let client = &self.client;
        self.waiter
            .execute_and_wait(
                client.create_alarm(details, None),
                |created: &Response<Alarm>| Some(created.data.id.clone()),
                |id| async move { client.get_alarm(&id).await },
                desired,
            )
            .await
    }

    pub async fn update_alarm_and_wait_for_state(
        &self,
        alarm_id: &str,
        details: &UpdateAlarmDetails,
        desired: &DesiredStates,
    ) -> CompositeResult<Response<Alarm>, Response<Alarm>> {
        let client = &self.client;
        self.waiter
            .execute_and_wait(
                client.update_alarm(alarm_id, details, None),
                |updated: &Response<Alarm>| Some(updated.data.id.clone()),
                |id| async move { client.get_alarm(&id).await },
                desired,
            )
            .await
    }

    /// Delete the alarm and wait for it to reach one of `desired`, or to
    /// disappear entirely.
    pub async fn delete_alarm_and_wait_for_state(
        &self,
        alarm_id: &str,
        desired: &DesiredStates,
    ) -> CompositeResult<Response<()>, Response<Alarm>> {
        let client = &self.client;
        log::debug!("Deleting alarm {alarm_id}");
        self.waiter
            .delete_and_wait(
                alarm_id,
                client.delete_alarm(alarm_id, None),
                |id| async move { client.get_alarm(&id).await },
                desired,
            )
            .await
    }
}
