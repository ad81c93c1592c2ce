use async_trait::async_trait;
use uuid::Uuid;

use super::{AccountClient, CREATED};
use crate::dispatch::DeletePolicy;
use crate::error::Result;
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::types::{CreateStorageConfiguration, StorageConfiguration};

/// Client for `.../storage-configurations`.
#[derive(Debug, Clone)]
pub struct StorageConfigurationsClient {
    account: AccountClient,
}

impl StorageConfigurationsClient {
    pub(crate) fn new(account: AccountClient) -> Self {
        Self { account }
    }

    fn path(&self) -> String {
        self.account.collection_path("storage-configurations")
    }

    fn id_path(&self, storage_configuration_id: Uuid) -> String {
        format!("{}/{storage_configuration_id}", self.path())
    }

    /// Lists every storage configuration of the account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self) -> Result<Vec<Bound<StorageConfiguration>>> {
        let records = self.account.rest().get(self.path()).await?.into_list(None)?;
        Ok(bind_all(records, self))
    }

    /// Fetches one storage configuration; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_id(
        &self,
        storage_configuration_id: Uuid,
    ) -> Result<Option<Bound<StorageConfiguration>>> {
        Ok(self
            .fetch(&storage_configuration_id)
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Returns the first storage configuration named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bound<StorageConfiguration>>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|storage| storage.storage_configuration_name == name))
    }

    /// Creates a storage configuration rooted at `bucket_name`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 or 201.
    pub async fn create(
        &self,
        name: &str,
        bucket_name: &str,
    ) -> Result<Bound<StorageConfiguration>> {
        let body = CreateStorageConfiguration::new(name, bucket_name);
        let record = self
            .account
            .rest()
            .post(self.path(), &body)
            .await?
            .into_record_any(CREATED)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes a storage configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] on 404 and [`crate::Error::Conflict`]
    /// on 409; every other status is accepted.
    pub async fn delete(&self, storage_configuration_id: Uuid) -> Result<()> {
        let response = self
            .account
            .rest()
            .delete(self.id_path(storage_configuration_id))
            .await?;
        DeletePolicy::Legacy.check(
            response,
            StorageConfiguration::KIND,
            storage_configuration_id,
        )
    }
}

impl Resource for StorageConfiguration {
    type Id = Uuid;
    type Client = StorageConfigurationsClient;
    const KIND: &'static str = "storage configuration";

    fn id(&self) -> Uuid {
        self.storage_configuration_id
    }
}

#[async_trait]
impl ResourceOps<StorageConfiguration> for StorageConfigurationsClient {
    async fn fetch(&self, id: &Uuid) -> Result<Option<StorageConfiguration>> {
        self.account
            .rest()
            .get(self.id_path(*id))
            .await?
            .into_optional()
    }
}

#[async_trait]
impl RemoveOps<StorageConfiguration> for StorageConfigurationsClient {
    async fn remove(&self, id: &Uuid) -> Result<()> {
        self.delete(*id).await
    }
}
