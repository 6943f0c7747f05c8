//! Subcommand handlers.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use stratus_sdk_common::{ApiClient, BearerTokenSigner, ClientConfig, Response, ServiceEndpoint};
use stratus_sdk_services::apm_traces::{self, TraceClient};
use stratus_sdk_services::monitoring::{
    self, MonitoringClient, MonitoringClientCompositeOperations,
};
use stratus_sdk_services::os_management::models::WorkRequest;
use stratus_sdk_services::os_management::{self, OsManagementClient};
use stratus_sdk_services::CompositeResult;
use stratus_sdk_waiter::{Completion, DesiredStates, OperationWaiter, WaitError, WaiterConfig};

use crate::{ApmTracesCommand, Commands, GlobalArgs, MonitoringCommand, OsManagementCommand};

/// How a successful command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The wait hit its deadline before a desired state was seen.
    TimedOut,
}

pub async fn run(global: &GlobalArgs, command: Commands) -> Result<Outcome> {
    log::debug!("Running {command:?} against region {}", global.region);
    match command {
        Commands::Monitoring(command) => monitoring_command(global, command).await,
        Commands::OsManagement(command) => os_management_command(global, command).await,
        Commands::ApmTraces(command) => apm_traces_command(global, command).await,
    }
}

async fn monitoring_command(global: &GlobalArgs, command: MonitoringCommand) -> Result<Outcome> {
    let client = MonitoringClient::from_api_client(api_client(global, &monitoring::ENDPOINT)?);
    match command {
        MonitoringCommand::GetAlarm { alarm_id } => {
            let alarm = client
                .get_alarm(&alarm_id)
                .await
                .with_context(|| format!("failed to get alarm {alarm_id}"))?;
            print_json(&alarm.data)?;
            Ok(Outcome::Done)
        }
        MonitoringCommand::DeleteAlarm {
            alarm_id,
            wait_for_states,
        } => {
            let operations = MonitoringClientCompositeOperations::with_waiter(client, waiter(global)?);
            let result = operations
                .delete_alarm_and_wait_for_state(&alarm_id, &DesiredStates::new(wait_for_states))
                .await;
            finish(&alarm_id, result)
        }
    }
}

async fn os_management_command(
    global: &GlobalArgs,
    command: OsManagementCommand,
) -> Result<Outcome> {
    let client = OsManagementClient::from_api_client(api_client(global, &os_management::ENDPOINT)?);
    match command {
        OsManagementCommand::GetWorkRequest { work_request_id } => {
            let work_request = client
                .get_work_request(&work_request_id)
                .await
                .with_context(|| format!("failed to get work request {work_request_id}"))?;
            print_json(&work_request.data)?;
            Ok(Outcome::Done)
        }
        OsManagementCommand::WaitWorkRequest {
            work_request_id,
            wait_for_states,
        } => {
            let client = &client;
            let result = waiter(global)?
                .execute_and_wait(
                    client.get_work_request(&work_request_id),
                    |current: &Response<WorkRequest>| Some(current.data.id.clone()),
                    |id| async move { client.get_work_request(&id).await },
                    &DesiredStates::new(wait_for_states),
                )
                .await;
            finish(&work_request_id, result)
        }
    }
}

async fn apm_traces_command(global: &GlobalArgs, command: ApmTracesCommand) -> Result<Outcome> {
    let client = TraceClient::from_api_client(api_client(global, &apm_traces::ENDPOINT)?);
    match command {
        ApmTracesCommand::GetTrace {
            apm_domain_id,
            trace_key,
        } => {
            let trace = client
                .get_trace(&apm_domain_id, &trace_key)
                .await
                .with_context(|| format!("failed to get trace {trace_key}"))?;
            print_json(&trace.data)?;
            Ok(Outcome::Done)
        }
    }
}

fn api_client(global: &GlobalArgs, service: &ServiceEndpoint) -> Result<ApiClient> {
    let mut config = ClientConfig::for_region(global.region.as_str());
    if let Some(endpoint) = &global.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    let client = ApiClient::new(&config, service)
        .with_context(|| format!("failed to configure the {} client", service.service))?;

    Ok(match &global.auth_token {
        Some(token) => client.with_signer(BearerTokenSigner::new(token.as_str())),
        None => client,
    })
}

fn waiter(global: &GlobalArgs) -> Result<OperationWaiter> {
    let config = WaiterConfig::from_secs(global.max_interval_seconds, global.max_wait_seconds)
        .context("invalid wait settings")?;
    Ok(OperationWaiter::new(config))
}

/// Print the final state of a composite operation and map it to an outcome.
fn finish<I, S>(id: &str, result: CompositeResult<I, Response<S>>) -> Result<Outcome>
where
    I: fmt::Debug + Send + Sync + 'static,
    S: Serialize + fmt::Debug + Send + Sync + 'static,
{
    match result {
        Ok(Completion::Reached(snapshot)) => {
            print_json(&snapshot.data)?;
            Ok(Outcome::Done)
        }
        Ok(Completion::Initiated(_)) => {
            print_json(&json!({ "id": id, "waited": false }))?;
            Ok(Outcome::Done)
        }
        Ok(Completion::Deleted(_)) => {
            print_json(&json!({ "id": id, "deleted": true }))?;
            Ok(Outcome::Done)
        }
        Err(WaitError::Timeout {
            last_snapshot,
            elapsed,
            desired,
            ..
        }) => {
            if let Some(snapshot) = last_snapshot {
                print_json(&snapshot.data)?;
            }
            eprintln!(
                "Timed out after {}s waiting for {id} to reach {}",
                elapsed.as_secs(),
                desired.join(", ")
            );
            Ok(Outcome::TimedOut)
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("waiting on {id} failed"))),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}
