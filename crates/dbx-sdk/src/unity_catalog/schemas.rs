use async_trait::async_trait;

use super::UnityCatalogClient;
use crate::dispatch::DeletePolicy;
use crate::error::Result;
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::transport::ApiRequest;
use crate::types::{CreateSchema, Schema, SchemaRef, SchemaUpdate};

/// Client for `api/2.1/unity-catalog/schemas`.
#[derive(Debug, Clone)]
pub struct SchemasClient {
    catalog: UnityCatalogClient,
}

impl SchemasClient {
    pub(crate) fn new(catalog: UnityCatalogClient) -> Self {
        Self { catalog }
    }

    fn path() -> String {
        UnityCatalogClient::path("schemas")
    }

    fn full_name_path(schema: &SchemaRef) -> String {
        format!("{}/{schema}", Self::path())
    }

    /// Lists the schemas of `catalog_name`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self, catalog_name: &str) -> Result<Vec<Bound<Schema>>> {
        let request = ApiRequest::get(Self::path()).with_query("catalog_name", catalog_name);
        let records = self
            .catalog
            .rest()
            .send(request)
            .await?
            .into_list(Some("schemas"))?;
        Ok(bind_all(records, self))
    }

    /// Fetches `catalog_name.schema_name`; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_name(
        &self,
        catalog_name: &str,
        schema_name: &str,
    ) -> Result<Option<Bound<Schema>>> {
        Ok(self
            .fetch(&SchemaRef::new(catalog_name, schema_name))
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Creates a schema.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the record.
    pub async fn create(&self, request: &CreateSchema) -> Result<Bound<Schema>> {
        let record: Schema = self
            .catalog
            .rest()
            .post(Self::path(), request)
            .await?
            .into_record(200)?;
        tracing::info!(schema = %record.reference(), "created schema");
        Ok(Bound::new(record, self.clone()))
    }

    /// Updates the set fields of a schema.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 with the record.
    pub async fn update(&self, schema: &SchemaRef, changes: &SchemaUpdate) -> Result<Bound<Schema>> {
        let response = self
            .catalog
            .rest()
            .patch(Self::full_name_path(schema), changes)
            .await?;
        let record = response.into_record(200)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes a schema; with `force` it is deleted even if not empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedResponse`] unless the service answers 200.
    pub async fn delete(&self, schema: &SchemaRef, force: bool) -> Result<()> {
        let request = ApiRequest::delete(Self::full_name_path(schema)).with_query("force", force);
        let response = self.catalog.rest().send(request).await?;
        DeletePolicy::Strict.check(response, Schema::KIND, schema)
    }
}

impl Resource for Schema {
    type Id = SchemaRef;
    type Client = SchemasClient;
    const KIND: &'static str = "schema";

    fn id(&self) -> SchemaRef {
        self.reference()
    }
}

#[async_trait]
impl ResourceOps<Schema> for SchemasClient {
    async fn fetch(&self, id: &SchemaRef) -> Result<Option<Schema>> {
        self.catalog
            .rest()
            .get(Self::full_name_path(id))
            .await?
            .into_optional()
    }
}

#[async_trait]
impl RemoveOps<Schema> for SchemasClient {
    async fn remove(&self, id: &SchemaRef) -> Result<()> {
        self.delete(id, false).await
    }
}

impl Bound<Schema> {
    /// Applies `changes` and replaces the local record with the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the update is rejected.
    pub async fn update(&mut self, changes: &SchemaUpdate) -> Result<()> {
        let updated = self.client().update(&self.reference(), changes).await?;
        self.set_record(updated.into_inner());
        Ok(())
    }

    /// Deletes the schema together with its contents.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200.
    pub async fn force_delete(&self) -> Result<()> {
        self.client().delete(&self.reference(), true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_paths_use_dotted_full_name() {
        assert_eq!(
            SchemasClient::full_name_path(&SchemaRef::new("main", "raw")),
            "api/2.1/unity-catalog/schemas/main.raw"
        );
    }
}
