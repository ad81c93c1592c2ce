use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use super::WorkspaceClient;
use crate::error::Result;
use crate::resource::{Bound, Resource, ResourceOps};
use crate::types::{ObjectPermission, PermissionLevels, Permissions, split_object_id};

const PERMISSIONS_PATH: &str = "api/2.0/permissions";

/// Object types the permissions API covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurableType {
    /// Personal access tokens (singleton object).
    Tokens,
    /// Password login (singleton object).
    Passwords,
    /// Clusters.
    Clusters,
    /// Cluster policies.
    ClusterPolicies,
    /// Instance pools.
    InstancePools,
    /// Jobs.
    Jobs,
    /// Delta Live Tables pipelines.
    Pipelines,
    /// Notebooks.
    Notebooks,
    /// Workspace directories.
    Directories,
    /// MLflow experiments.
    Experiments,
    /// Registered models.
    RegisteredModels,
    /// SQL warehouses.
    SqlWarehouses,
    /// Repos.
    Repos,
}

impl SecurableType {
    /// Path segment after `api/2.0/permissions/`.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Tokens | Self::Passwords => "authorization",
            Self::Clusters => "clusters",
            Self::ClusterPolicies => "cluster-policies",
            Self::InstancePools => "instance-pools",
            Self::Jobs => "jobs",
            Self::Pipelines => "pipelines",
            Self::Notebooks => "notebooks",
            Self::Directories => "directories",
            Self::Experiments => "experiments",
            Self::RegisteredModels => "registered-models",
            Self::SqlWarehouses => "sql/warehouses",
            Self::Repos => "repos",
        }
    }
}

impl fmt::Display for SecurableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Serialize)]
struct AccessControlBody<'a> {
    access_control_list: &'a [ObjectPermission],
}

/// Client for `api/2.0/permissions`.
#[derive(Debug, Clone)]
pub struct PermissionsClient {
    workspace: WorkspaceClient,
}

impl PermissionsClient {
    pub(crate) fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }

    fn path(object_type: &str, object_id: &str) -> String {
        format!("{PERMISSIONS_PATH}/{object_type}/{object_id}")
    }

    /// Fetches the access control list of an object; `None` when the object
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get(&self, object_type: &str, object_id: &str) -> Result<Option<Bound<Permissions>>> {
        let record = self
            .workspace
            .rest()
            .get(Self::path(object_type, object_id))
            .await?
            .into_optional()?;
        Ok(record.map(|record| Bound::new(record, self.clone())))
    }

    /// Lists the permission levels assignable on an object.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn permission_levels(
        &self,
        object_type: &str,
        object_id: &str,
    ) -> Result<PermissionLevels> {
        self.workspace
            .rest()
            .get(format!(
                "{}/permissionLevels",
                Self::path(object_type, object_id)
            ))
            .await?
            .into_record(200)
    }

    /// Adds `access_control_list` to the object's existing grants.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the new list.
    pub async fn grant(
        &self,
        object_type: &str,
        object_id: &str,
        access_control_list: &[ObjectPermission],
    ) -> Result<Bound<Permissions>> {
        let record = self
            .workspace
            .rest()
            .patch(
                Self::path(object_type, object_id),
                &AccessControlBody {
                    access_control_list,
                },
            )
            .await?
            .into_record(200)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Replaces the object's direct grants with `access_control_list`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the new list.
    pub async fn replace(
        &self,
        object_type: &str,
        object_id: &str,
        access_control_list: &[ObjectPermission],
    ) -> Result<Bound<Permissions>> {
        let record = self
            .workspace
            .rest()
            .put(
                Self::path(object_type, object_id),
                &AccessControlBody {
                    access_control_list,
                },
            )
            .await?
            .into_record(200)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Fetches permissions of a typed securable.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn of(
        &self,
        securable: SecurableType,
        id: impl fmt::Display,
    ) -> Result<Option<Bound<Permissions>>> {
        self.get(securable.path_segment(), &id.to_string()).await
    }

    /// Token usage permissions.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn tokens(&self) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Tokens, "tokens").await
    }

    /// Password login permissions.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn passwords(&self) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Passwords, "passwords").await
    }

    /// Permissions of a cluster.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn cluster(&self, cluster_id: &str) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Clusters, cluster_id).await
    }

    /// Permissions of a cluster policy.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn cluster_policy(&self, policy_id: &str) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::ClusterPolicies, policy_id).await
    }

    /// Permissions of an instance pool.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn instance_pool(&self, pool_id: &str) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::InstancePools, pool_id).await
    }

    /// Permissions of a job.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn job(&self, job_id: i64) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Jobs, job_id).await
    }

    /// Permissions of a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn pipeline(&self, pipeline_id: &str) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Pipelines, pipeline_id).await
    }

    /// Permissions of a notebook.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn notebook(&self, notebook_id: i64) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Notebooks, notebook_id).await
    }

    /// Permissions of a directory.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn directory(&self, directory_id: i64) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Directories, directory_id).await
    }

    /// Permissions of an experiment.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn experiment(&self, experiment_id: i64) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Experiments, experiment_id).await
    }

    /// Permissions of a registered model.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn registered_model(&self, model_id: &str) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::RegisteredModels, model_id).await
    }

    /// Permissions of a SQL warehouse.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn sql_warehouse(&self, warehouse_id: &str) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::SqlWarehouses, warehouse_id).await
    }

    /// Permissions of a repo.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn repo(&self, repo_id: i64) -> Result<Option<Bound<Permissions>>> {
        self.of(SecurableType::Repos, repo_id).await
    }
}

impl Resource for Permissions {
    type Id = String;
    type Client = PermissionsClient;
    const KIND: &'static str = "permissions";

    fn id(&self) -> String {
        self.object_id.clone()
    }
}

#[async_trait]
impl ResourceOps<Permissions> for PermissionsClient {
    async fn fetch(&self, id: &String) -> Result<Option<Permissions>> {
        let (object_type, object_id) = split_object_id(id);
        self.workspace
            .rest()
            .get(Self::path(object_type, object_id))
            .await?
            .into_optional()
    }
}

impl Bound<Permissions> {
    /// Adds grants to this object and replaces the local list with the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the grant is rejected.
    pub async fn grant(&mut self, access_control_list: &[ObjectPermission]) -> Result<&Permissions> {
        let (object_type, object_id) = self.object_path();
        let updated = self
            .client()
            .grant(object_type, object_id, access_control_list)
            .await?;
        self.set_record(updated.into_inner());
        Ok(self.record())
    }

    /// Replaces this object's grants and the local list with the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the replacement is rejected.
    pub async fn replace(
        &mut self,
        access_control_list: &[ObjectPermission],
    ) -> Result<&Permissions> {
        let (object_type, object_id) = self.object_path();
        let updated = self
            .client()
            .replace(object_type, object_id, access_control_list)
            .await?;
        self.set_record(updated.into_inner());
        Ok(self.record())
    }
}
