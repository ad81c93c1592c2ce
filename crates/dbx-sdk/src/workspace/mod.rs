//! Workspace-level API, served from the workspace's own host.

mod cluster_policies;
mod instance_profiles;
mod permissions;

use std::fmt;
use std::sync::Arc;

pub use cluster_policies::{CAN_USE, ClusterPoliciesClient};
pub use instance_profiles::InstanceProfilesClient;
pub use permissions::{PermissionsClient, SecurableType};

use crate::auth::BasicAuth;
use crate::rest::RestClient;
use crate::unity_catalog::UnityCatalogClient;

/// Root client for one workspace host.
#[derive(Clone)]
pub struct WorkspaceClient {
    rest: Arc<RestClient>,
}

impl fmt::Debug for WorkspaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceClient")
            .field("host", &self.rest.host())
            .finish_non_exhaustive()
    }
}

impl WorkspaceClient {
    /// Creates a root client over `rest`.
    #[must_use]
    pub fn new(rest: RestClient) -> Self {
        Self {
            rest: Arc::new(rest),
        }
    }

    /// The workspace host.
    #[must_use]
    pub fn host(&self) -> &str {
        self.rest.host()
    }

    /// The credentials this client authenticates with.
    #[must_use]
    pub fn auth(&self) -> &BasicAuth {
        self.rest.auth()
    }

    pub(crate) fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Returns true when both handles refer to the same root client.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rest, &other.rest)
    }

    /// Cluster policies.
    #[must_use]
    pub fn cluster_policies(&self) -> ClusterPoliciesClient {
        ClusterPoliciesClient::new(self.clone())
    }

    /// Instance profiles.
    #[must_use]
    pub fn instance_profiles(&self) -> InstanceProfilesClient {
        InstanceProfilesClient::new(self.clone())
    }

    /// Object permissions.
    #[must_use]
    pub fn permissions(&self) -> PermissionsClient {
        PermissionsClient::new(self.clone())
    }

    /// Unity Catalog.
    #[must_use]
    pub fn unity_catalog(&self) -> UnityCatalogClient {
        UnityCatalogClient::new(self.clone())
    }
}
