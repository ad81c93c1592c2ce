//! Account-level records: credentials, storage, networks and workspaces.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cross-account IAM role the platform assumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StsRole {
    /// Role ARN.
    pub role_arn: String,
    /// External id the platform passes when assuming the role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<Uuid>,
}

/// AWS credential wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsCredentials {
    /// The assumed role.
    pub sts_role: StsRole,
}

/// A credential configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Identifier.
    pub credentials_id: Uuid,
    /// Display name.
    pub credentials_name: String,
    /// Role definition.
    pub aws_credentials: AwsCredentials,
    /// Owning account.
    pub account_id: Uuid,
    /// Creation time in epoch milliseconds.
    pub creation_time: i64,
}

/// Role reference in a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StsRoleRequest {
    /// Role ARN.
    pub role_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct AwsCredentialsRequest {
    sts_role: StsRoleRequest,
}

/// Body of a credentials create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCredentials {
    credentials_name: String,
    aws_credentials: AwsCredentialsRequest,
}

impl CreateCredentials {
    /// Creates a request for `name` backed by `role_arn`.
    #[must_use]
    pub fn new(name: impl Into<String>, role_arn: impl Into<String>) -> Self {
        Self {
            credentials_name: name.into(),
            aws_credentials: AwsCredentialsRequest {
                sts_role: StsRoleRequest {
                    role_arn: role_arn.into(),
                },
            },
        }
    }
}

/// Root bucket of a storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootBucketInfo {
    /// S3 bucket name.
    pub bucket_name: String,
}

/// A storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfiguration {
    /// Identifier.
    pub storage_configuration_id: Uuid,
    /// Display name.
    pub storage_configuration_name: String,
    /// Root bucket.
    pub root_bucket_info: RootBucketInfo,
    /// Owning account.
    pub account_id: Uuid,
    /// Creation time in epoch milliseconds.
    pub creation_time: i64,
}

/// Body of a storage configuration create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateStorageConfiguration {
    /// Display name.
    pub storage_configuration_name: String,
    /// Root bucket.
    pub root_bucket_info: RootBucketInfo,
}

impl CreateStorageConfiguration {
    /// Creates a request for `name` rooted at `bucket_name`.
    #[must_use]
    pub fn new(name: impl Into<String>, bucket_name: impl Into<String>) -> Self {
        Self {
            storage_configuration_name: name.into(),
            root_bucket_info: RootBucketInfo {
                bucket_name: bucket_name.into(),
            },
        }
    }
}

/// Validation warning on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkWarning {
    /// Warning category.
    pub warning_type: String,
    /// Human-readable message.
    pub warning_message: String,
}

/// Validation error on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkError {
    /// Error category.
    pub error_type: String,
    /// Human-readable message.
    pub error_message: String,
}

/// VPC endpoint registrations attached to a network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkVpcEndpoints {
    /// REST API endpoint ids.
    pub rest_api: Vec<String>,
    /// Secure cluster connectivity relay endpoint ids.
    pub dataplane_relay: Vec<String>,
}

/// A customer-managed network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Identifier.
    pub network_id: Uuid,
    /// Display name.
    pub network_name: String,
    /// VPC id.
    pub vpc_id: String,
    /// Subnets.
    pub subnet_ids: Vec<String>,
    /// Security groups.
    pub security_group_ids: Vec<String>,
    /// Validation status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_status: Option<String>,
    /// Validation warnings.
    #[serde(default)]
    pub warning_messages: Vec<NetworkWarning>,
    /// Validation errors.
    #[serde(default)]
    pub error_messages: Vec<NetworkError>,
    /// Workspace using this network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
    /// Owning account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    /// Creation time in epoch milliseconds.
    pub creation_time: i64,
    /// Attached VPC endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_endpoints: Option<NetworkVpcEndpoints>,
}

/// Body of a network create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateNetwork {
    /// Display name.
    pub network_name: String,
    /// VPC id.
    pub vpc_id: String,
    /// Subnets.
    pub subnet_ids: Vec<String>,
    /// Security groups.
    pub security_group_ids: Vec<String>,
    /// VPC endpoints to attach.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_endpoints: Option<NetworkVpcEndpoints>,
}

/// Lifecycle state of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkspaceStatus {
    /// Accepted but not yet started.
    NotProvisioned,
    /// Infrastructure is being created.
    Provisioning,
    /// Ready for use.
    Running,
    /// Provisioning failed.
    Failed,
    /// Disabled by the platform.
    Banned,
    /// Being torn down.
    Cancelling,
    /// A status this client does not know.
    Other(String),
}

impl WorkspaceStatus {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotProvisioned => "NOT_PROVISIONED",
            Self::Provisioning => "PROVISIONING",
            Self::Running => "RUNNING",
            Self::Failed => "FAILED",
            Self::Banned => "BANNED",
            Self::Cancelling => "CANCELLING",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for WorkspaceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NOT_PROVISIONED" => Self::NotProvisioned,
            "PROVISIONING" => Self::Provisioning,
            "RUNNING" => Self::Running,
            "FAILED" => Self::Failed,
            "BANNED" => Self::Banned,
            "CANCELLING" => Self::Cancelling,
            _ => Self::Other(value),
        }
    }
}

impl From<WorkspaceStatus> for String {
    fn from(value: WorkspaceStatus) -> Self {
        match value {
            WorkspaceStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    /// Identifier.
    pub workspace_id: i64,
    /// Display name.
    pub workspace_name: String,
    /// Subdomain under `cloud.databricks.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
    /// AWS region.
    pub aws_region: String,
    /// Pricing tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_tier: Option<String>,
    /// Lifecycle state.
    pub workspace_status: WorkspaceStatus,
    /// Explanation of the lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_status_message: Option<String>,
    /// Credential configuration.
    pub credentials_id: Uuid,
    /// Storage configuration.
    pub storage_configuration_id: Uuid,
    /// Customer-managed network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<Uuid>,
    /// Key for managed services encryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_services_customer_managed_key_id: Option<Uuid>,
    /// Private access settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_access_settings_id: Option<Uuid>,
    /// Key for workspace storage encryption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_customer_managed_key_id: Option<Uuid>,
    /// Whether secure cluster connectivity is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_no_public_ip_enabled: Option<bool>,
    /// Owning account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    /// Creation time in epoch milliseconds.
    pub creation_time: i64,
}

/// Body of a workspace create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateWorkspace {
    /// Display name.
    pub workspace_name: String,
    /// AWS region.
    pub aws_region: String,
    /// Pricing tier.
    pub pricing_tier: String,
    /// Credential configuration.
    pub credentials_id: Uuid,
    /// Storage configuration.
    pub storage_configuration_id: Uuid,
    /// Customer-managed network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<Uuid>,
    /// Key for managed services encryption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_services_customer_managed_key_id: Option<Uuid>,
    /// Key for workspace storage encryption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_customer_managed_key_id: Option<Uuid>,
    /// Private access settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_access_settings_id: Option<Uuid>,
    /// Requested deployment subdomain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
}

impl CreateWorkspace {
    /// Creates a request with the required fields set.
    #[must_use]
    pub fn new(
        workspace_name: impl Into<String>,
        aws_region: impl Into<String>,
        pricing_tier: impl Into<String>,
        credentials_id: Uuid,
        storage_configuration_id: Uuid,
    ) -> Self {
        Self {
            workspace_name: workspace_name.into(),
            aws_region: aws_region.into(),
            pricing_tier: pricing_tier.into(),
            credentials_id,
            storage_configuration_id,
            network_id: None,
            managed_services_customer_managed_key_id: None,
            storage_customer_managed_key_id: None,
            private_access_settings_id: None,
            deployment_name: None,
        }
    }
}

/// Body of a workspace update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceUpdate {
    /// New AWS region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    /// New credential configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_id: Option<Uuid>,
    /// New storage configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_configuration_id: Option<Uuid>,
    /// New network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<Uuid>,
    /// New managed services key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_services_customer_managed_key_id: Option<Uuid>,
    /// New storage key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_customer_managed_key_id: Option<Uuid>,
    /// New private access settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_access_settings_id: Option<Uuid>,
}
