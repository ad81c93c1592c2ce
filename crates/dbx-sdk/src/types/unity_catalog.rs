//! Unity Catalog records: catalogs, schemas, metastores and assignments.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Name; the identity.
    pub name: String,
    /// Owning metastore.
    pub metastore_id: Uuid,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// `MANAGED_CATALOG`, `DELTASHARING_CATALOG`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_type: Option<String>,
    /// Managed storage root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<String>,
    /// Resolved storage location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    /// Delta Sharing provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// Delta Sharing share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_name: Option<String>,
    /// User properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Owner principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Securable type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub securable_type: Option<String>,
    /// Securable kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub securable_kind: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last update time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Last updater.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Body of a catalog create request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateCatalog {
    /// Name.
    pub name: String,
    /// Managed storage root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<String>,
    /// Delta Sharing provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// User properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Delta Sharing share.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_name: Option<String>,
}

impl CreateCatalog {
    /// A catalog named `name` with nothing else set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Body of a catalog update. `name` renames the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Replacement properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
    /// New owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Two-part schema name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaRef {
    /// Parent catalog.
    pub catalog_name: String,
    /// Schema name.
    pub name: String,
}

impl SchemaRef {
    /// Creates a reference to `catalog_name.name`.
    #[must_use]
    pub fn new(catalog_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.catalog_name, self.name)
    }
}

/// A schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Name within the catalog.
    pub name: String,
    /// Parent catalog.
    pub catalog_name: String,
    /// `catalog.schema`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Owning metastore.
    pub metastore_id: Uuid,
    /// Type of the parent catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_type: Option<String>,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Managed storage root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<String>,
    /// Resolved storage location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
    /// User properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Owner principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Securable type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub securable_type: Option<String>,
    /// Securable kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub securable_kind: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last update time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Last updater.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Schema {
    /// The two-part reference of this schema.
    #[must_use]
    pub fn reference(&self) -> SchemaRef {
        SchemaRef::new(self.catalog_name.clone(), self.name.clone())
    }
}

/// Body of a schema create request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateSchema {
    /// Parent catalog.
    pub catalog_name: String,
    /// Schema name.
    pub name: String,
    /// Managed storage root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<String>,
    /// User properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreateSchema {
    /// A schema `name` in `catalog_name` with nothing else set.
    #[must_use]
    pub fn new(catalog_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Body of a schema update. `name` renames the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Replacement properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
    /// New owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// A metastore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metastore {
    /// Identifier.
    pub metastore_id: Uuid,
    /// Display name.
    pub name: String,
    /// Managed storage root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<String>,
    /// Cloud region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Cloud vendor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<String>,
    /// Owner principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Default data access configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_data_access_config_id: Option<String>,
    /// `INTERNAL` or `INTERNAL_AND_EXTERNAL`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_sharing_scope: Option<String>,
    /// Recipient token lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_sharing_recipient_token_lifetime_in_seconds: Option<i64>,
    /// Organization name used in Delta Sharing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_sharing_organization_name: Option<String>,
    /// Privilege model version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privilege_model_version: Option<String>,
    /// Credential used to access the storage root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_root_credential_id: Option<Uuid>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Creator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Last update time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    /// Last updater.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Body of a metastore create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateMetastore {
    /// Display name.
    pub name: String,
    /// Managed storage root.
    pub storage_root: String,
    /// Cloud region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Body of a metastore update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetastoreUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New sharing scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_sharing_scope: Option<String>,
    /// New storage root credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root_credential_id: Option<Uuid>,
    /// New privilege model version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privilege_model_version: Option<String>,
    /// New recipient token lifetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_sharing_recipient_token_lifetime_in_seconds: Option<i64>,
    /// New sharing organization name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_sharing_organization_name: Option<String>,
    /// New owner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// The metastore a workspace is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetastoreAssignment {
    /// Workspace.
    pub workspace_id: i64,
    /// Attached metastore.
    pub metastore_id: Uuid,
    /// Catalog selected by default in the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_catalog_name: Option<String>,
}
