//! Unity Catalog API (`api/2.1/unity-catalog`), served from a workspace host.

mod catalogs;
mod metastores;
mod schemas;

pub use catalogs::CatalogsClient;
pub use metastores::MetastoresClient;
pub use schemas::SchemasClient;

use crate::rest::RestClient;
use crate::workspace::WorkspaceClient;

/// Path prefix of every Unity Catalog route.
pub const UNITY_CATALOG_PREFIX: &str = "api/2.1/unity-catalog";

/// Entry point to catalogs, schemas and metastores of one workspace.
#[derive(Debug, Clone)]
pub struct UnityCatalogClient {
    workspace: WorkspaceClient,
}

impl UnityCatalogClient {
    pub(crate) fn new(workspace: WorkspaceClient) -> Self {
        Self { workspace }
    }

    /// The workspace this client talks to.
    #[must_use]
    pub fn workspace(&self) -> &WorkspaceClient {
        &self.workspace
    }

    /// Catalogs.
    #[must_use]
    pub fn catalogs(&self) -> CatalogsClient {
        CatalogsClient::new(self.clone())
    }

    /// Schemas.
    #[must_use]
    pub fn schemas(&self) -> SchemasClient {
        SchemasClient::new(self.clone())
    }

    /// Metastores and metastore assignments.
    #[must_use]
    pub fn metastores(&self) -> MetastoresClient {
        MetastoresClient::new(self.clone())
    }

    pub(crate) fn rest(&self) -> &RestClient {
        self.workspace.rest()
    }

    pub(crate) fn path(segment: &str) -> String {
        format!("{UNITY_CATALOG_PREFIX}/{segment}")
    }
}
