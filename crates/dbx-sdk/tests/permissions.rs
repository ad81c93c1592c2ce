//! Permissions client and bound access control lists.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dbx_sdk::transport::Method;
use dbx_sdk::types::{ObjectPermission, Principal};
use dbx_sdk::workspace::SecurableType;
use dbx_sdk::Error;
use dbx_test_utils::{permissions_json, workspace_client, RecordingTransport};
use serde_json::json;

#[tokio::test]
async fn shortcuts_build_object_paths() {
    let transport = RecordingTransport::new();
    let permissions = workspace_client(&transport).permissions();

    assert!(permissions.tokens().await.expect("tokens").is_none());
    assert!(permissions.passwords().await.expect("passwords").is_none());
    assert!(permissions.job(12).await.expect("job").is_none());
    assert!(permissions.sql_warehouse("w1").await.expect("warehouse").is_none());
    assert!(permissions.registered_model("m1").await.expect("model").is_none());
    assert!(permissions.repo(3).await.expect("repo").is_none());
    assert!(permissions
        .of(SecurableType::InstancePools, "pool-1")
        .await
        .expect("pool")
        .is_none());

    let paths: Vec<String> = transport.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        vec![
            "api/2.0/permissions/authorization/tokens",
            "api/2.0/permissions/authorization/passwords",
            "api/2.0/permissions/jobs/12",
            "api/2.0/permissions/sql/warehouses/w1",
            "api/2.0/permissions/registered-models/m1",
            "api/2.0/permissions/repos/3",
            "api/2.0/permissions/instance-pools/pool-1",
        ]
    );
}

#[tokio::test]
async fn bound_grant_splits_object_id_and_updates_in_place() {
    let transport = RecordingTransport::new();
    let path = "api/2.0/permissions/sql/warehouses/w1";
    transport.respond(
        Method::GET,
        path,
        200,
        permissions_json("/sql/warehouses/w1", "warehouses", "owner@example.com", "IS_OWNER"),
    );
    let mut granted = permissions_json("/sql/warehouses/w1", "warehouses", "owner@example.com", "IS_OWNER");
    granted["access_control_list"]
        .as_array_mut()
        .expect("list")
        .push(json!({"group_name": "analysts", "all_permissions": [{"permission_level": "CAN_USE"}]}));
    transport.respond(Method::PATCH, path, 200, granted);

    let mut permissions = workspace_client(&transport)
        .permissions()
        .sql_warehouse("w1")
        .await
        .expect("get")
        .expect("present");
    let updated = permissions
        .grant(&[ObjectPermission::group("analysts", "CAN_USE")])
        .await
        .expect("grant");

    let analysts = updated
        .entry_for(&Principal::Group("analysts".to_string()))
        .expect("granted");
    assert!(analysts.has_level("CAN_USE"));
    assert_eq!(permissions.access_control_list.len(), 2);

    let patch = transport.last_request().expect("request");
    assert_eq!(patch.path, path);
    assert_eq!(
        patch.json(),
        &json!({"access_control_list": [{"group_name": "analysts", "permission_level": "CAN_USE"}]})
    );
}

#[tokio::test]
async fn bound_replace_puts_and_refresh_rereads() {
    let transport = RecordingTransport::new();
    let path = "api/2.0/permissions/jobs/12";
    transport
        .respond(Method::GET, path, 200, permissions_json("/jobs/12", "job", "a@example.com", "CAN_VIEW"))
        .respond(Method::GET, path, 200, permissions_json("/jobs/12", "job", "c@example.com", "CAN_VIEW"));
    transport.respond(
        Method::PUT,
        path,
        200,
        permissions_json("/jobs/12", "job", "b@example.com", "CAN_MANAGE"),
    );

    let mut permissions = workspace_client(&transport)
        .permissions()
        .job(12)
        .await
        .expect("get")
        .expect("present");
    permissions
        .replace(&[ObjectPermission::user("b@example.com", "CAN_MANAGE")])
        .await
        .expect("replace");
    assert_eq!(
        permissions.access_control_list[0].user_name.as_deref(),
        Some("b@example.com")
    );

    permissions.refresh().await.expect("refresh");
    assert_eq!(
        permissions.access_control_list[0].user_name.as_deref(),
        Some("c@example.com")
    );
}

#[tokio::test]
async fn permission_levels_require_200() {
    let transport = RecordingTransport::new();
    let path = "api/2.0/permissions/clusters/c1/permissionLevels";
    transport.respond(
        Method::GET,
        path,
        200,
        json!({"permission_levels": [
            {"permission_level": "CAN_ATTACH_TO", "description": "Can attach"},
            {"permission_level": "CAN_MANAGE", "description": "Can manage"},
        ]}),
    );
    let permissions = workspace_client(&transport).permissions();

    let levels = permissions
        .permission_levels("clusters", "c1")
        .await
        .expect("levels");
    assert_eq!(levels.permission_levels.len(), 2);

    let err = permissions
        .permission_levels("clusters", "c2")
        .await
        .expect_err("404");
    assert!(matches!(err, Error::UnexpectedResponse { status: 404, .. }));
}
