use async_trait::async_trait;
use uuid::Uuid;

use super::AccountClient;
use crate::dispatch::DeletePolicy;
use crate::error::Result;
use crate::resource::{Bound, RemoveOps, Resource, ResourceOps, bind_all};
use crate::types::{CreateCredentials, Credentials};

/// Client for `.../credentials`.
#[derive(Debug, Clone)]
pub struct CredentialsClient {
    account: AccountClient,
}

impl CredentialsClient {
    pub(crate) fn new(account: AccountClient) -> Self {
        Self { account }
    }

    fn path(&self) -> String {
        self.account.collection_path("credentials")
    }

    fn id_path(&self, credentials_id: Uuid) -> String {
        format!("{}/{credentials_id}", self.path())
    }

    /// Lists every credential configuration of the account.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn list(&self) -> Result<Vec<Bound<Credentials>>> {
        let records = self.account.rest().get(self.path()).await?.into_list(None)?;
        Ok(bind_all(records, self))
    }

    /// Fetches one credential configuration; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures or unexpected statuses.
    pub async fn get_by_id(&self, credentials_id: Uuid) -> Result<Option<Bound<Credentials>>> {
        Ok(self
            .fetch(&credentials_id)
            .await?
            .map(|record| Bound::new(record, self.clone())))
    }

    /// Returns the first credential configuration named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if listing fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Bound<Credentials>>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|credentials| credentials.credentials_name == name))
    }

    /// Creates a credential configuration for the role `role_arn`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the service answers 201.
    pub async fn create(&self, name: &str, role_arn: &str) -> Result<Bound<Credentials>> {
        let body = CreateCredentials::new(name, role_arn);
        let record = self
            .account
            .rest()
            .post(self.path(), &body)
            .await?
            .into_record(201)?;
        tracing::info!(credentials_name = name, "created credentials");
        Ok(Bound::new(record, self.clone()))
    }

    /// Deletes a credential configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnexpectedResponse`] unless the service answers 200.
    pub async fn delete(&self, credentials_id: Uuid) -> Result<()> {
        let response = self
            .account
            .rest()
            .delete(self.id_path(credentials_id))
            .await?;
        DeletePolicy::Strict.check(response, Credentials::KIND, credentials_id)
    }
}

impl Resource for Credentials {
    type Id = Uuid;
    type Client = CredentialsClient;
    const KIND: &'static str = "credentials";

    fn id(&self) -> Uuid {
        self.credentials_id
    }
}

#[async_trait]
impl ResourceOps<Credentials> for CredentialsClient {
    async fn fetch(&self, id: &Uuid) -> Result<Option<Credentials>> {
        self.account
            .rest()
            .get(self.id_path(*id))
            .await?
            .into_optional()
    }
}

#[async_trait]
impl RemoveOps<Credentials> for CredentialsClient {
    async fn remove(&self, id: &Uuid) -> Result<()> {
        self.delete(*id).await
    }
}
