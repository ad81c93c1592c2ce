use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::UnityCatalogClient;
use crate::dispatch::DeletePolicy;
use crate::error::Result;
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::transport::ApiRequest;
use crate::types::{CreateMetastore, Metastore, MetastoreAssignment, MetastoreUpdate};

#[derive(Serialize)]
struct AssignmentBody<'a> {
    metastore_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_catalog_name: Option<&'a str>,
}

#[derive(Serialize)]
struct UnassignBody {
    metastore_id: Uuid,
}

/// Client for `api/2.1/unity-catalog/metastores` and workspace assignments.
#[derive(Debug, Clone)]
pub struct MetastoresClient {
    catalog: UnityCatalogClient,
}

impl MetastoresClient {
    pub(crate) fn new(catalog: UnityCatalogClient) -> Self {
        Self { catalog }
    }

    fn path() -> String {
        UnityCatalogClient::path("metastores")
    }

    fn id_path(metastore_id: Uuid) -> String {
        format!("{}/{metastore_id}", Self::path())
    }

    fn assignment_path(workspace_id: i64) -> String {
        UnityCatalogClient::path(&format!("workspaces/{workspace_id}/metastore"))
    }

    /// Lists the metastores of the account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self) -> Result<Vec<Bound<Metastore>>> {
        let records = self
            .catalog
            .rest()
            .get(Self::path())
            .await?
            .into_list(Some("metastores"))?;
        Ok(bind_all(records, self))
    }

    /// Fetches one metastore; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_id(&self, metastore_id: Uuid) -> Result<Option<Bound<Metastore>>> {
        Ok(self
            .fetch(&metastore_id)
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Returns the first metastore named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bound<Metastore>>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|metastore| metastore.name == name))
    }

    /// Creates a metastore.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the record.
    pub async fn create(&self, request: &CreateMetastore) -> Result<Bound<Metastore>> {
        let record: Metastore = self
            .catalog
            .rest()
            .post(Self::path(), request)
            .await?
            .into_record(200)?;
        tracing::info!(metastore_id = %record.metastore_id, name = %record.name, "created metastore");
        Ok(Bound::new(record, self.clone()))
    }

    /// Updates the set fields of a metastore.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the record.
    pub async fn update(
        &self,
        metastore_id: Uuid,
        changes: &MetastoreUpdate,
    ) -> Result<Bound<Metastore>> {
        let response = self
            .catalog
            .rest()
            .patch(Self::id_path(metastore_id), changes)
            .await?;
        let record = response.into_record(200)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes a metastore; with `force` it is deleted even if not empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedResponse`] unless the service answers 200.
    pub async fn delete(&self, metastore_id: Uuid, force: bool) -> Result<()> {
        let request = ApiRequest::delete(Self::id_path(metastore_id)).with_query("force", force);
        let response = self.catalog.rest().send(request).await?;
        DeletePolicy::Strict.check(response, Metastore::KIND, metastore_id)
    }

    /// The metastore assigned to the workspace this client talks to.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn current_assignment(&self) -> Result<Option<MetastoreAssignment>> {
        self.catalog
            .rest()
            .get(UnityCatalogClient::path("current-metastore-assignment"))
            .await?
            .into_optional()
    }

    /// Attaches `metastore_id` to a workspace.
    ///
    /// The service only acknowledges, so the returned assignment is built
    /// from the request.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn create_assignment(
        &self,
        workspace_id: i64,
        metastore_id: Uuid,
        default_catalog_name: &str,
    ) -> Result<MetastoreAssignment> {
        self.catalog
            .rest()
            .put(
                Self::assignment_path(workspace_id),
                &AssignmentBody {
                    metastore_id,
                    default_catalog_name: Some(default_catalog_name),
                },
            )
            .await?
            .expect_status(200)?;
        tracing::info!(workspace_id, %metastore_id, "assigned metastore");
        Ok(MetastoreAssignment {
            workspace_id,
            metastore_id,
            default_catalog_name: Some(default_catalog_name.to_string()),
        })
    }

    /// Changes a workspace's assignment or default catalog.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn update_assignment(
        &self,
        workspace_id: i64,
        metastore_id: Uuid,
        default_catalog_name: Option<&str>,
    ) -> Result<MetastoreAssignment> {
        self.catalog
            .rest()
            .patch(
                Self::assignment_path(workspace_id),
                &AssignmentBody {
                    metastore_id,
                    default_catalog_name,
                },
            )
            .await?
            .expect_status(200)?;
        Ok(MetastoreAssignment {
            workspace_id,
            metastore_id,
            default_catalog_name: default_catalog_name.map(str::to_string),
        })
    }

    /// Detaches `metastore_id` from a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedResponse`] unless the service answers 200.
    pub async fn delete_assignment(&self, workspace_id: i64, metastore_id: Uuid) -> Result<()> {
        let request = ApiRequest::delete(Self::assignment_path(workspace_id))
            .with_json(&UnassignBody { metastore_id })?;
        let response = self.catalog.rest().send(request).await?;
        DeletePolicy::Strict.check(response, "metastore assignment", workspace_id)
    }
}

impl Resource for Metastore {
    type Id = Uuid;
    type Client = MetastoresClient;
    const KIND: &'static str = "metastore";

    fn id(&self) -> Uuid {
        self.metastore_id
    }
}

#[async_trait]
impl ResourceOps<Metastore> for MetastoresClient {
    async fn fetch(&self, id: &Uuid) -> Result<Option<Metastore>> {
        self.catalog
            .rest()
            .get(Self::id_path(*id))
            .await?
            .into_optional()
    }
}

#[async_trait]
impl RemoveOps<Metastore> for MetastoresClient {
    async fn remove(&self, id: &Uuid) -> Result<()> {
        self.delete(*id, false).await
    }
}

impl Bound<Metastore> {
    /// Applies `changes` and replaces the local record with the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    pub async fn update(&mut self, changes: &MetastoreUpdate) -> Result<()> {
        let updated = self.client().update(self.metastore_id, changes).await?;
        self.set_record(updated.into_inner());
        Ok(())
    }

    /// Deletes the metastore together with its contents.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn force_delete(&self) -> Result<()> {
        self.client().delete(self.metastore_id, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_body_omits_unset_default_catalog() {
        let id = Uuid::nil();
        let body = serde_json::to_value(AssignmentBody {
            metastore_id: id,
            default_catalog_name: None,
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({"metastore_id": id}));
        assert_eq!(
            MetastoresClient::assignment_path(7),
            "api/2.1/unity-catalog/workspaces/7/metastore"
        );
    }
}
