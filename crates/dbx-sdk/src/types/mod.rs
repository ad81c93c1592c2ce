//! Typed records and request bodies.
//!
//! Field names match the wire JSON. Optional request fields are omitted, not
//! sent as `null`.

mod account;
mod cluster_policy;
mod instance_profile;
mod permissions;
mod unity_catalog;

pub use account::{
    AwsCredentials, CreateCredentials, CreateNetwork, CreateStorageConfiguration,
    CreateWorkspace, Credentials, Network, NetworkError, NetworkVpcEndpoints, NetworkWarning,
    RootBucketInfo, StorageConfiguration, StsRole, StsRoleRequest, Workspace, WorkspaceStatus,
    WorkspaceUpdate,
};
pub use cluster_policy::{
    ClusterPolicy, ClusterPolicyChanges, CreateClusterPolicy, EditClusterPolicy, PolicyDefinition,
    PolicyElement, SortColumn, SortOrder,
};
pub use instance_profile::{CreateInstanceProfile, EditInstanceProfile, InstanceProfile};
pub use permissions::{
    AccessControl, ObjectPermission, Permission, PermissionLevel, PermissionLevels, Permissions,
    Principal,
};
pub(crate) use permissions::split_object_id;
pub use unity_catalog::{
    Catalog, CatalogUpdate, CreateCatalog, CreateMetastore, CreateSchema, Metastore,
    MetastoreAssignment, MetastoreUpdate, Schema, SchemaRef, SchemaUpdate,
};

use chrono::{DateTime, Utc};

/// Converts a millisecond epoch timestamp into a UTC datetime.
#[must_use]
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}
