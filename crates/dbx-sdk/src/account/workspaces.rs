use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{AccountClient, CREATED};
use crate::auth::BasicAuth;
use crate::config::PollConfig;
use crate::dispatch::DeletePolicy;
use crate::error::{Error, Result};
use crate::registry::ClientRegistry;
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::types::{CreateWorkspace, Workspace, WorkspaceStatus, WorkspaceUpdate};
use crate::workspace::WorkspaceClient;

/// Domain under which workspace deployments are served.
pub const WORKSPACE_DOMAIN: &str = "cloud.databricks.com";

/// Client for `.../workspaces`.
#[derive(Debug, Clone)]
pub struct WorkspacesClient {
    account: AccountClient,
}

impl WorkspacesClient {
    pub(crate) fn new(account: AccountClient) -> Self {
        Self { account }
    }

    fn path(&self) -> String {
        self.account.collection_path("workspaces")
    }

    fn id_path(&self, workspace_id: i64) -> String {
        format!("{}/{workspace_id}", self.path())
    }

    /// Lists every workspace of the account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self) -> Result<Vec<Bound<Workspace>>> {
        let records = self.account.rest().get(self.path()).await?.into_list(None)?;
        Ok(bind_all(records, self))
    }

    /// Fetches one workspace; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_id(&self, workspace_id: i64) -> Result<Option<Bound<Workspace>>> {
        Ok(self
            .fetch(&workspace_id)
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Returns the first workspace named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bound<Workspace>>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|workspace| workspace.workspace_name == name))
    }

    /// Starts provisioning a workspace.
    ///
    /// The returned record is usually still `PROVISIONING`; see
    /// [`Bound::<Workspace>::wait_on_provisioning`].
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 or 201.
    pub async fn create(&self, request: &CreateWorkspace) -> Result<Bound<Workspace>> {
        let record: Workspace = self
            .account
            .rest()
            .post(self.path(), request)
            .await?
            .into_record_any(CREATED)?;
        tracing::info!(
            workspace_id = record.workspace_id,
            workspace_name = %record.workspace_name,
            status = %record.workspace_status,
            "created workspace"
        );
        Ok(Bound::new(record, self.clone()))
    }

    /// Updates the set fields of a workspace and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the record.
    pub async fn update(
        &self,
        workspace_id: i64,
        changes: &WorkspaceUpdate,
    ) -> Result<Bound<Workspace>> {
        let response = self
            .account
            .rest()
            .patch(self.id_path(workspace_id), changes)
            .await?;
        let record = response.into_record(200)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] on 404 and [`crate::Error::Conflict`]
    /// on 409; every other status is accepted.
    pub async fn delete(&self, workspace_id: i64) -> Result<()> {
        let response = self
            .account
            .rest()
            .delete(self.id_path(workspace_id))
            .await?;
        DeletePolicy::Legacy.check(response, Workspace::KIND, workspace_id)
    }
}

impl Resource for Workspace {
    type Id = i64;
    type Client = WorkspacesClient;
    const KIND: &'static str = "workspace";

    fn id(&self) -> i64 {
        self.workspace_id
    }
}

#[async_trait]
impl ResourceOps<Workspace> for WorkspacesClient {
    async fn fetch(&self, id: &i64) -> Result<Option<Workspace>> {
        self.account
            .rest()
            .get(self.id_path(*id))
            .await?
            .into_optional()
    }
}

#[async_trait]
impl RemoveOps<Workspace> for WorkspacesClient {
    async fn remove(&self, id: &i64) -> Result<()> {
        self.delete(*id).await
    }
}

impl Bound<Workspace> {
    /// Applies `changes` and replaces the local record with the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    pub async fn update(&mut self, changes: &WorkspaceUpdate) -> Result<()> {
        let updated = self.client().update(self.workspace_id, changes).await?;
        self.set_record(updated.into_inner());
        Ok(())
    }

    /// `{deployment_name}.cloud.databricks.com`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the workspace has no deployment name yet.
    pub fn workspace_host(&self) -> Result<String> {
        match self.deployment_name.as_deref() {
            Some(deployment) if !deployment.is_empty() => {
                Ok(format!("{deployment}.{WORKSPACE_DOMAIN}"))
            }
            _ => Err(Error::InvalidInput(format!(
                "workspace {} has no deployment name",
                self.workspace_id
            ))),
        }
    }

    /// Returns the registry's root client for this workspace's host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is unknown or no credentials resolve.
    pub fn workspace_client(
        &self,
        registry: &ClientRegistry,
        auth: Option<BasicAuth>,
    ) -> Result<WorkspaceClient> {
        registry.workspace(&self.workspace_host()?, auth)
    }

    /// Refreshes, then polls every `poll.interval` while the workspace is
    /// `PROVISIONING`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] once `poll.timeout` has elapsed,
    /// [`Error::Cancelled`] when `cancel` fires, and
    /// [`Error::ResourceGone`] if the workspace disappears meanwhile.
    pub async fn wait_on_provisioning(
        &mut self,
        poll: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let started = Instant::now();
        let workspace_id = self.workspace_id;
        let operation = move || format!("provisioning of workspace {workspace_id}");

        self.refresh().await?;
        while self.workspace_status == WorkspaceStatus::Provisioning {
            let mut delay = poll.interval;
            if let Some(timeout) = poll.timeout {
                let elapsed = started.elapsed();
                if elapsed >= timeout {
                    return Err(Error::Timeout {
                        operation: operation(),
                        elapsed,
                    });
                }
                delay = delay.min(timeout - elapsed);
            }

            tracing::debug!(
                workspace_id = self.workspace_id,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "workspace still provisioning"
            );
            tokio::select! {
                () = cancel.cancelled() => {
                    return Err(Error::Cancelled { operation: operation() });
                }
                () = tokio::time::sleep(delay) => {}
            }
            self.refresh().await?;
        }

        tracing::info!(
            workspace_id = self.workspace_id,
            status = %self.workspace_status,
            "workspace left provisioning"
        );
        Ok(())
    }
}
