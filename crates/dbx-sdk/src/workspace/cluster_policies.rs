use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::WorkspaceClient;
use crate::dispatch::DeletePolicy;
use crate::error::{Error, Result};
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::transport::ApiRequest;
use crate::types::{
    ClusterPolicy, ClusterPolicyChanges, CreateClusterPolicy, EditClusterPolicy, ObjectPermission,
    PermissionLevels, Permissions, PolicyDefinition, SortColumn, SortOrder,
};

const POLICIES_PATH: &str = "api/2.0/policies/clusters";

/// Permission level that lets a principal create clusters from a policy.
pub const CAN_USE: &str = "CAN_USE";

#[derive(Serialize)]
struct ListPolicies {
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_column: Option<SortColumn>,
}

#[derive(Serialize)]
struct PolicyIdBody<'a> {
    policy_id: &'a str,
}

#[derive(Deserialize)]
struct CreatedPolicy {
    policy_id: String,
}

/// Client for `api/2.0/policies/clusters`.
#[derive(Debug, Clone)]
pub struct ClusterPoliciesClient {
    workspace: WorkspaceClient,
}

impl ClusterPoliciesClient {
    pub(crate) fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }

    fn path(action: &str) -> String {
        format!("{POLICIES_PATH}/{action}")
    }

    /// Lists the workspace's policies, optionally sorted.
    ///
    /// The sort fields travel in the body of the GET request.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(
        &self,
        sort_order: Option<SortOrder>,
        sort_column: Option<SortColumn>,
    ) -> Result<Vec<Bound<ClusterPolicy>>> {
        let request = ApiRequest::get(Self::path("list")).with_json(&ListPolicies {
            sort_order,
            sort_column,
        })?;
        let records = self
            .workspace
            .rest()
            .send(request)
            .await?
            .into_list(Some("policies"))?;
        Ok(bind_all(records, self))
    }

    /// Fetches one policy; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_id(&self, policy_id: &str) -> Result<Option<Bound<ClusterPolicy>>> {
        Ok(self
            .fetch(&policy_id.to_string())
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Returns the first policy named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bound<ClusterPolicy>>> {
        Ok(self
            .list(None, None)
            .await?
            .into_iter()
            .find(|policy| policy.name == name))
    }

    /// Creates a standalone policy from `definition`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service acknowledges the policy and it can
    /// be read back.
    pub async fn create(
        &self,
        name: &str,
        definition: PolicyDefinition,
        description: Option<String>,
    ) -> Result<Bound<ClusterPolicy>> {
        self.create_from(&CreateClusterPolicy::standalone(name, definition, description))
            .await
    }

    /// Creates a policy derived from `policy_family_id`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service acknowledges the policy and it can
    /// be read back.
    pub async fn create_with_family(
        &self,
        name: &str,
        policy_family_id: &str,
        overrides: PolicyDefinition,
        description: Option<String>,
    ) -> Result<Bound<ClusterPolicy>> {
        self.create_from(&CreateClusterPolicy::with_family(
            name,
            policy_family_id,
            overrides,
            description,
        ))
        .await
    }

    async fn create_from(&self, request: &CreateClusterPolicy) -> Result<Bound<ClusterPolicy>> {
        let created: CreatedPolicy = self
            .workspace
            .rest()
            .post(Self::path("create"), request)
            .await?
            .into_record(200)?;
        tracing::info!(policy_id = %created.policy_id, name = %request.name, "created cluster policy");
        self.get_by_id(&created.policy_id)
            .await?
            .ok_or_else(|| Error::resource_gone(ClusterPolicy::KIND, created.policy_id))
    }

    /// Sends an edit request and reads the policy back.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service acknowledges the edit.
    pub async fn update(&self, request: &EditClusterPolicy) -> Result<Bound<ClusterPolicy>> {
        let response = self
            .workspace
            .rest()
            .post(Self::path("edit"), request)
            .await?;
        response.expect_status(200)?;
        let record = self
            .fetch(&request.policy_id)
            .await?
            .ok_or_else(|| Error::resource_gone(ClusterPolicy::KIND, &request.policy_id))?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes a policy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedResponse`] unless the service answers 200.
    pub async fn delete(&self, policy_id: &str) -> Result<()> {
        let response = self
            .workspace
            .rest()
            .post(Self::path("delete"), &PolicyIdBody { policy_id })
            .await?;
        DeletePolicy::Strict.check(response, ClusterPolicy::KIND, policy_id)
    }
}

impl Resource for ClusterPolicy {
    type Id = String;
    type Client = ClusterPoliciesClient;
    const KIND: &'static str = "cluster policy";

    fn id(&self) -> String {
        self.policy_id.clone()
    }
}

#[async_trait]
impl ResourceOps<ClusterPolicy> for ClusterPoliciesClient {
    async fn fetch(&self, id: &String) -> Result<Option<ClusterPolicy>> {
        let request = ApiRequest::get(Self::path("get")).with_json(&PolicyIdBody { policy_id: id })?;
        self.workspace.rest().send(request).await?.into_optional()
    }
}

#[async_trait]
impl RemoveOps<ClusterPolicy> for ClusterPoliciesClient {
    async fn remove(&self, id: &String) -> Result<()> {
        self.delete(id).await
    }
}

impl Bound<ClusterPolicy> {
    /// Merges `changes` into the policy, sends the edit and refreshes.
    ///
    /// Standalone policies update name, description and definition;
    /// family-derived policies update name, description, family and overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit is rejected or the policy disappears.
    pub async fn update(&mut self, changes: ClusterPolicyChanges) -> Result<()> {
        let request = changes.edit_request(self.record());
        let updated = self.client().update(&request).await?;
        self.set_record(updated.into_inner());
        Ok(())
    }

    /// The policy's access control list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceGone`] if the service has no permissions for
    /// the policy.
    pub async fn permissions(&self) -> Result<Bound<Permissions>> {
        self.client()
            .workspace
            .permissions()
            .cluster_policy(&self.policy_id)
            .await?
            .ok_or_else(|| Error::resource_gone("cluster policy permissions", &self.policy_id))
    }

    /// Permission levels assignable on the policy.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn permission_levels(&self) -> Result<PermissionLevels> {
        self.client()
            .workspace
            .permissions()
            .permission_levels("cluster-policies", &self.policy_id)
            .await
    }

    /// Grants `CAN_USE` to each given principal, keeping existing grants.
    ///
    /// # Errors
    ///
    /// Returns an error if the permissions cannot be read or the grant fails.
    pub async fn grant_use(
        &self,
        user_name: Option<&str>,
        group_name: Option<&str>,
        service_principal_name: Option<&str>,
    ) -> Result<Bound<Permissions>> {
        let acl = can_use_acl(
            user_name.into_iter(),
            group_name.into_iter(),
            service_principal_name.into_iter(),
        );
        let mut permissions = self.permissions().await?;
        permissions.grant(&acl).await?;
        Ok(permissions)
    }

    /// Replaces the policy's grants with `CAN_USE` for exactly the given
    /// principals.
    ///
    /// # Errors
    ///
    /// Returns an error if the permissions cannot be read or replaced.
    pub async fn replace_permissions(
        &self,
        user_names: &[&str],
        group_names: &[&str],
        service_principal_names: &[&str],
    ) -> Result<Bound<Permissions>> {
        let acl = can_use_acl(
            user_names.iter().copied(),
            group_names.iter().copied(),
            service_principal_names.iter().copied(),
        );
        let mut permissions = self.permissions().await?;
        permissions.replace(&acl).await?;
        Ok(permissions)
    }
}

fn can_use_acl<'a>(
    users: impl Iterator<Item = &'a str>,
    groups: impl Iterator<Item = &'a str>,
    service_principals: impl Iterator<Item = &'a str>,
) -> Vec<ObjectPermission> {
    users
        .map(|name| ObjectPermission::user(name, CAN_USE))
        .chain(groups.map(|name| ObjectPermission::group(name, CAN_USE)))
        .chain(service_principals.map(|name| ObjectPermission::service_principal(name, CAN_USE)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_use_acl_keeps_principal_order() {
        let acl = can_use_acl(
            ["ann"].into_iter(),
            std::iter::empty(),
            ["etl"].into_iter(),
        );
        assert_eq!(
            acl,
            vec![
                ObjectPermission::user("ann", CAN_USE),
                ObjectPermission::service_principal("etl", CAN_USE),
            ]
        );
    }

    #[test]
    fn list_body_omits_unset_sort_fields() {
        let body = serde_json::to_value(ListPolicies {
            sort_order: None,
            sort_column: Some(SortColumn::PolicyName),
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({"sort_column": "POLICY_NAME"}));
    }
}
