//! OS management API client.

use stratus_sdk_common::{
    ApiClient, ApiError, ApiRequest, ApiResult, ClientConfig, Method, Response, ServiceEndpoint,
    IF_MATCH,
};

use super::models::{
    CreateManagedInstanceGroupDetails, ListManagedInstanceGroupsRequest, ManagedInstanceGroup,
    ManagedInstanceGroupSummary, UpdateManagedInstanceGroupDetails, WorkRequest,
};

pub const ENDPOINT: ServiceEndpoint = ServiceEndpoint {
    service: "osms",
    api_version: "20190801",
};

const GROUP_PATH: &str = "/managedInstanceGroups/{managedInstanceGroupId}";

#[derive(Debug, Clone)]
pub struct OsManagementClient {
    api: ApiClient,
}

impl OsManagementClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        Ok(Self::from_api_client(ApiClient::new(config, &ENDPOINT)?))
    }

    pub fn from_api_client(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api_client(&self) -> &ApiClient {
        &self.api
    }

    pub async fn create_managed_instance_group(
        &self,
        details: &CreateManagedInstanceGroupDetails,
        retry_token: Option<&str>,
    ) -> ApiResult<Response<ManagedInstanceGroup>> {
        let request = ApiRequest::new(
            "CreateManagedInstanceGroup",
            Method::POST,
            "/managedInstanceGroups",
        )
        .retry_token(retry_token)
        .json_body(details)?;
        self.api.call(request).await
    }

    pub async fn get_managed_instance_group(
        &self,
        group_id: &str,
    ) -> ApiResult<Response<ManagedInstanceGroup>> {
        let request = ApiRequest::new("GetManagedInstanceGroup", Method::GET, GROUP_PATH)
            .path_param("managedInstanceGroupId", group_id)?;
        self.api.call(request).await
    }

    pub async fn update_managed_instance_group(
        &self,
        group_id: &str,
        details: &UpdateManagedInstanceGroupDetails,
        if_match: Option<&str>,
    ) -> ApiResult<Response<ManagedInstanceGroup>> {
        let request = ApiRequest::new("UpdateManagedInstanceGroup", Method::PUT, GROUP_PATH)
            .path_param("managedInstanceGroupId", group_id)?
            .header(IF_MATCH, if_match)
            .json_body(details)?;
        self.api.call(request).await
    }

    pub async fn delete_managed_instance_group(
        &self,
        group_id: &str,
        if_match: Option<&str>,
    ) -> ApiResult<Response<()>> {
        let request = ApiRequest::new("DeleteManagedInstanceGroup", Method::DELETE, GROUP_PATH)
            .path_param("managedInstanceGroupId", group_id)?
            .header(IF_MATCH, if_match);
        self.api.call_empty(request).await
    }

    pub async fn list_managed_instance_groups(
        &self,
        filter: &ListManagedInstanceGroupsRequest,
    ) -> ApiResult<Response<Vec<ManagedInstanceGroupSummary>>> {
        let request = ApiRequest::new(
            "ListManagedInstanceGroups",
            Method::GET,
            "/managedInstanceGroups",
        )
        .query("compartmentId", Some(&filter.compartment_id))
        .query("displayName", filter.display_name.as_ref())
        .query("lifecycleState", filter.lifecycle_state)
        .query("osFamily", filter.os_family)
        .query("sortBy", filter.sort_by)
        .query("sortOrder", filter.sort_order)
        .query("limit", filter.limit)
        .query("page", filter.page.as_ref());
        self.api.call(request).await
    }

    /// Start installing a package on a managed instance. The install runs as
    /// a work request whose id comes back in the `opc-work-request-id` header.
    pub async fn install_package_on_managed_instance(
        &self,
        managed_instance_id: &str,
        software_package_name: &str,
    ) -> ApiResult<Response<()>> {
        if software_package_name.trim().is_empty() {
            return Err(ApiError::invalid_parameter(
                "softwarePackageName must not be blank",
            ));
        }
        let request = ApiRequest::new(
            "InstallPackageOnManagedInstance",
            Method::POST,
            "/managedInstances/{managedInstanceId}/actions/packages/install",
        )
        .path_param("managedInstanceId", managed_instance_id)?
        .query("softwarePackageName", Some(software_package_name));
        self.api.call_empty(request).await
    }

    pub async fn get_work_request(&self, work_request_id: &str) -> ApiResult<Response<WorkRequest>> {
        let request = ApiRequest::new("GetWorkRequest", Method::GET, "/workRequests/{workRequestId}")
            .path_param("workRequestId", work_request_id)?;
        self.api.call(request).await
    }
}
