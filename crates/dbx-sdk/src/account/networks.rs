use async_trait::async_trait;
use uuid::Uuid;

use super::{AccountClient, CREATED};
use crate::dispatch::DeletePolicy;
use crate::error::Result;
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::types::{CreateNetwork, Network};

/// Client for `.../networks`.
#[derive(Debug, Clone)]
pub struct NetworksClient {
    account: AccountClient,
}

impl NetworksClient {
    pub(crate) fn new(account: AccountClient) -> Self {
        Self { account }
    }

    fn path(&self) -> String {
        self.account.collection_path("networks")
    }

    fn id_path(&self, network_id: Uuid) -> String {
        format!("{}/{network_id}", self.path())
    }

    /// Lists every network configuration of the account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self) -> Result<Vec<Bound<Network>>> {
        let records = self.account.rest().get(self.path()).await?.into_list(None)?;
        Ok(bind_all(records, self))
    }

    /// Fetches one network configuration; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_id(&self, network_id: Uuid) -> Result<Option<Bound<Network>>> {
        Ok(self
            .fetch(&network_id)
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Returns the first network configuration named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bound<Network>>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|network| network.network_name == name))
    }

    /// Registers a customer-managed VPC.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 200 or 201.
    pub async fn create(&self, request: &CreateNetwork) -> Result<Bound<Network>> {
        let record = self
            .account
            .rest()
            .post(self.path(), request)
            .await?
            .into_record_any(CREATED)?;
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes a network configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] on 404 and [`crate::Error::Conflict`]
    /// on 409, for example while a workspace still uses the network.
    pub async fn delete(&self, network_id: Uuid) -> Result<()> {
        let response = self.account.rest().delete(self.id_path(network_id)).await?;
        DeletePolicy::Legacy.check(response, Network::KIND, network_id)
    }
}

impl Resource for Network {
    type Id = Uuid;
    type Client = NetworksClient;
    const KIND: &'static str = "network";

    fn id(&self) -> Uuid {
        self.network_id
    }
}

#[async_trait]
impl ResourceOps<Network> for NetworksClient {
    async fn fetch(&self, id: &Uuid) -> Result<Option<Network>> {
        self.account
            .rest()
            .get(self.id_path(*id))
            .await?
            .into_optional()
    }
}

#[async_trait]
impl RemoveOps<Network> for NetworksClient {
    async fn remove(&self, id: &Uuid) -> Result<()> {
        self.delete(*id).await
    }
}
