//! Wire-format records with sensible defaults, plus root clients wired to a
//! [`RecordingTransport`].

use std::sync::Arc;

use dbx_sdk::account::ACCOUNT_HOST;
use dbx_sdk::rest::RestClient;
use dbx_sdk::{AccountClient, BasicAuth, WorkspaceClient};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transport::{RecordingTransport, TEST_HOST};

/// Account id used by [`account_client`].
pub const ACCOUNT_ID: Uuid = Uuid::from_u128(0x0a11_ce00_0000_4000_8000_0000_0000_0001);

/// Credentials used by the harness clients.
pub fn test_auth() -> BasicAuth {
    BasicAuth::new("admin@example.com", "secret")
}

/// Account client whose requests go to `transport`.
pub fn account_client(transport: &RecordingTransport) -> AccountClient {
    let rest = RestClient::new(ACCOUNT_HOST, test_auth(), Arc::new(transport.clone()));
    AccountClient::new(ACCOUNT_ID, rest)
}

/// Workspace client whose requests go to `transport`.
pub fn workspace_client(transport: &RecordingTransport) -> WorkspaceClient {
    let rest = RestClient::new(TEST_HOST, test_auth(), Arc::new(transport.clone()));
    WorkspaceClient::new(rest)
}

/// Account API path of a collection, for scripting routes.
pub fn account_path(segment: &str) -> String {
    format!("api/2.0/accounts/{ACCOUNT_ID}/{segment}")
}

/// A credentials record.
pub fn credentials_json(id: Uuid, name: &str) -> Value {
    json!({
        "credentials_id": id,
        "credentials_name": name,
        "aws_credentials": {
            "sts_role": {
                "role_arn": "arn:aws:iam::123456789012:role/cross-account",
                "external_id": ACCOUNT_ID,
            }
        },
        "account_id": ACCOUNT_ID,
        "creation_time": 1_700_000_000_000_i64,
    })
}

/// A storage configuration record.
pub fn storage_configuration_json(id: Uuid, name: &str) -> Value {
    json!({
        "storage_configuration_id": id,
        "storage_configuration_name": name,
        "root_bucket_info": {"bucket_name": "root-bucket"},
        "account_id": ACCOUNT_ID,
        "creation_time": 1_700_000_000_000_i64,
    })
}

/// A network record.
pub fn network_json(id: Uuid, name: &str) -> Value {
    json!({
        "network_id": id,
        "network_name": name,
        "vpc_id": "vpc-0123",
        "subnet_ids": ["subnet-a", "subnet-b"],
        "security_group_ids": ["sg-1"],
        "vpc_status": "VALID",
        "warning_messages": [],
        "error_messages": [],
        "account_id": ACCOUNT_ID,
        "creation_time": 1_700_000_000_000_i64,
    })
}

/// A workspace record in `status`.
pub fn workspace_json(id: i64, name: &str, status: &str) -> Value {
    json!({
        "workspace_id": id,
        "workspace_name": name,
        "deployment_name": format!("dbc-{id}"),
        "aws_region": "us-west-2",
        "pricing_tier": "PREMIUM",
        "workspace_status": status,
        "workspace_status_message": "Workspace resources are being set up.",
        "credentials_id": Uuid::from_u128(1),
        "storage_configuration_id": Uuid::from_u128(2),
        "account_id": ACCOUNT_ID,
        "creation_time": 1_700_000_000_000_i64,
    })
}

/// A standalone cluster policy record; `definition` is the embedded JSON
/// string exactly as the service returns it.
pub fn cluster_policy_json(id: &str, name: &str, definition: &str) -> Value {
    json!({
        "policy_id": id,
        "name": name,
        "definition": definition,
        "is_default": false,
        "creator_user_name": "admin@example.com",
        "created_at_timestamp": 1_700_000_000_000_i64,
    })
}

/// An instance profile record.
pub fn instance_profile_json(arn: &str) -> Value {
    json!({
        "instance_profile_arn": arn,
        "is_meta_instance_profile": false,
    })
}

/// A permissions record with one direct grant to `user_name`.
pub fn permissions_json(object_id: &str, object_type: &str, user_name: &str, level: &str) -> Value {
    json!({
        "object_id": object_id,
        "object_type": object_type,
        "access_control_list": [{
            "user_name": user_name,
            "all_permissions": [{"permission_level": level, "inherited": false}],
        }],
    })
}

/// Metastore id used by Unity Catalog fixtures.
pub const METASTORE_ID: Uuid = Uuid::from_u128(0x3e7a_5703_0000_4000_8000_0000_0000_0042);

/// A catalog record.
pub fn catalog_json(name: &str) -> Value {
    json!({
        "name": name,
        "metastore_id": METASTORE_ID,
        "catalog_type": "MANAGED_CATALOG",
        "properties": {},
        "owner": "admin@example.com",
        "created_at": 1_700_000_000_000_i64,
    })
}

/// A schema record.
pub fn schema_json(catalog_name: &str, name: &str) -> Value {
    json!({
        "name": name,
        "catalog_name": catalog_name,
        "full_name": format!("{catalog_name}.{name}"),
        "metastore_id": METASTORE_ID,
        "properties": {},
        "owner": "admin@example.com",
    })
}

/// A metastore record.
pub fn metastore_json(id: Uuid, name: &str) -> Value {
    json!({
        "metastore_id": id,
        "name": name,
        "storage_root": "s3://metastore-root/",
        "region": "us-west-2",
        "cloud": "aws",
        "owner": "admin@example.com",
    })
}
