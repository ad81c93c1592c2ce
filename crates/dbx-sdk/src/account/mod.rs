//! Account-level API.
//!
//! All account resources live under `api/2.0/accounts/{account_id}` on the
//! shared accounts host.

mod credentials;
mod networks;
mod storage;
mod workspaces;

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

pub use credentials::CredentialsClient;
pub use networks::NetworksClient;
pub use storage::StorageConfigurationsClient;
pub use workspaces::WorkspacesClient;

use crate::auth::BasicAuth;
use crate::rest::RestClient;

/// Host serving the account API.
pub const ACCOUNT_HOST: &str = "accounts.cloud.databricks.com";

/// Path prefix of every account API route, before the account id.
pub const ACCOUNT_API_PREFIX: &str = "api/2.0/accounts";

/// Statuses accepted as a successful create for storage configurations,
/// networks and workspaces. Credentials accept only 201.
const CREATED: &[u16] = &[200, 201];

struct AccountInner {
    account_id: Uuid,
    account_path: String,
    rest: RestClient,
}

/// Root client for one account.
///
/// Cloning is cheap and clones are the same instance for
/// [`AccountClient::ptr_eq`].
#[derive(Clone)]
pub struct AccountClient {
    inner: Arc<AccountInner>,
}

impl fmt::Debug for AccountClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountClient")
            .field("account_id", &self.inner.account_id)
            .field("rest", &self.inner.rest)
            .finish()
    }
}

impl AccountClient {
    /// Creates a root client for `account_id` over `rest`.
    #[must_use]
    pub fn new(account_id: Uuid, rest: RestClient) -> Self {
        Self {
            inner: Arc::new(AccountInner {
                account_id,
                account_path: format!("{ACCOUNT_API_PREFIX}/{account_id}"),
                rest,
            }),
        }
    }

    /// The account this client manages.
    #[must_use]
    pub fn account_id(&self) -> Uuid {
        self.inner.account_id
    }

    /// `api/2.0/accounts/{account_id}`.
    #[must_use]
    pub fn account_path(&self) -> &str {
        &self.inner.account_path
    }

    /// The credentials this client authenticates with.
    #[must_use]
    pub fn auth(&self) -> &BasicAuth {
        self.inner.rest.auth()
    }

    pub(crate) fn rest(&self) -> &RestClient {
        &self.inner.rest
    }

    pub(crate) fn collection_path(&self, segment: &str) -> String {
        format!("{}/{segment}", self.inner.account_path)
    }

    /// Returns true when both handles refer to the same root client.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Credential configurations.
    #[must_use]
    pub fn credentials(&self) -> CredentialsClient {
        CredentialsClient::new(self.clone())
    }

    /// Storage configurations.
    #[must_use]
    pub fn storage_configurations(&self) -> StorageConfigurationsClient {
        StorageConfigurationsClient::new(self.clone())
    }

    /// Network configurations.
    #[must_use]
    pub fn networks(&self) -> NetworksClient {
        NetworksClient::new(self.clone())
    }

    /// Workspaces.
    #[must_use]
    pub fn workspaces(&self) -> WorkspacesClient {
        WorkspacesClient::new(self.clone())
    }
}
