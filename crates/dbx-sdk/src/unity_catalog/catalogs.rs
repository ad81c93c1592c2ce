use async_trait::async_trait;

use super::UnityCatalogClient;
use crate::dispatch::DeletePolicy;
use crate::error::Result;
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::transport::ApiRequest;
use crate::types::{Catalog, CatalogUpdate, CreateCatalog};

/// Client for `api/2.1/unity-catalog/catalogs`.
#[derive(Debug, Clone)]
pub struct CatalogsClient {
    catalog: UnityCatalogClient,
}

impl CatalogsClient {
    pub(crate) fn new(catalog: UnityCatalogClient) -> Self {
        Self { catalog }
    }

    fn path() -> String {
        UnityCatalogClient::path("catalogs")
    }

    fn name_path(name: &str) -> String {
        format!("{}/{name}", Self::path())
    }

    /// Lists the catalogs visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self) -> Result<Vec<Bound<Catalog>>> {
        let records = self
            .catalog
            .rest()
            .get(Self::path())
            .await?
            .into_list(Some("catalogs"))?;
        Ok(bind_all(records, self))
    }

    /// Fetches one catalog; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bound<Catalog>>> {
        Ok(self
            .fetch(&name.to_string())
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Creates a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the record.
    pub async fn create(&self, request: &CreateCatalog) -> Result<Bound<Catalog>> {
        let record: Catalog = self
            .catalog
            .rest()
            .post(Self::path(), request)
            .await?
            .into_record(200)?;
        tracing::info!(catalog = %record.name, "created catalog");
        Ok(Bound::new(record, self.clone()))
    }

    /// Updates the set fields of catalog `name`. Setting `changes.name`
    /// renames the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the record.
    pub async fn update(&self, name: &str, changes: &CatalogUpdate) -> Result<Bound<Catalog>> {
        let response = self
            .catalog
            .rest()
            .patch(Self::name_path(name), changes)
            .await?;
        let record = response.into_record(200)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes catalog `name`; with `force` it is deleted even if not empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedResponse`] unless the service answers 200.
    pub async fn delete(&self, name: &str, force: bool) -> Result<()> {
        let request = ApiRequest::delete(Self::name_path(name)).with_query("force", force);
        let response = self.catalog.rest().send(request).await?;
        DeletePolicy::Strict.check(response, Catalog::KIND, name)
    }
}

impl Resource for Catalog {
    type Id = String;
    type Client = CatalogsClient;
    const KIND: &'static str = "catalog";

    fn id(&self) -> String {
        self.name.clone()
    }
}

#[async_trait]
impl ResourceOps<Catalog> for CatalogsClient {
    async fn fetch(&self, id: &String) -> Result<Option<Catalog>> {
        self.catalog
            .rest()
            .get(Self::name_path(id))
            .await?
            .into_optional()
    }
}

#[async_trait]
impl RemoveOps<Catalog> for CatalogsClient {
    async fn remove(&self, id: &String) -> Result<()> {
        self.delete(id, false).await
    }
}

impl Bound<Catalog> {
    /// Applies `changes` and replaces the local record with the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    pub async fn update(&mut self, changes: &CatalogUpdate) -> Result<()> {
        let updated = self.client().update(&self.name, changes).await?;
        self.set_record(updated.into_inner());
        Ok(())
    }

    /// Deletes the catalog together with its contents.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn force_delete(&self) -> Result<()> {
        self.client().delete(&self.name, true).await
    }
}
