//! Workspace lifecycle: create, update, delete and provisioning waits.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use dbx_sdk::transport::Method;
use dbx_sdk::types::{CreateWorkspace, Workspace, WorkspaceStatus, WorkspaceUpdate};
use dbx_sdk::{
    Bound, CancellationToken, ClientConfig, ClientRegistry, Error, PollConfig, StaticCredentials,
};
use dbx_test_utils::{
    account_client, account_path, init_test_logging, test_auth, workspace_json, RecordingConnector,
    RecordingTransport,
};
use serde_json::json;
use uuid::Uuid;

fn workspace_path(id: i64) -> String {
    account_path(&format!("workspaces/{id}"))
}

fn provisioning_record() -> Workspace {
    serde_json::from_value(workspace_json(7, "a", "PROVISIONING")).expect("decode")
}

fn poll(interval_secs: u64, timeout_secs: Option<u64>) -> PollConfig {
    PollConfig {
        interval: Duration::from_secs(interval_secs),
        timeout: timeout_secs.map(Duration::from_secs),
    }
}

#[tokio::test]
async fn get_by_id_404_is_none() {
    let transport = RecordingTransport::new();
    let found = account_client(&transport)
        .workspaces()
        .get_by_id(42)
        .await
        .expect("get");
    assert!(found.is_none());
    assert_eq!(transport.last_request().expect("request").path, workspace_path(42));
}

#[tokio::test]
async fn create_accepts_200() {
    let transport = RecordingTransport::new();
    transport.respond(
        Method::POST,
        &account_path("workspaces"),
        200,
        workspace_json(8, "etl", "PROVISIONING"),
    );
    let request =
        CreateWorkspace::new("etl", "us-west-2", "PREMIUM", Uuid::from_u128(1), Uuid::from_u128(2));

    let created = account_client(&transport)
        .workspaces()
        .create(&request)
        .await
        .expect("200 is a create");

    assert_eq!(created.workspace_id, 8);
    assert_eq!(created.workspace_status, WorkspaceStatus::Provisioning);
}

#[tokio::test]
async fn create_sends_only_provided_fields() {
    let transport = RecordingTransport::new();
    transport.respond(
        Method::POST,
        &account_path("workspaces"),
        201,
        workspace_json(7, "analytics", "PROVISIONING"),
    );
    let credentials_id = Uuid::from_u128(1);
    let storage_id = Uuid::from_u128(2);
    let mut request =
        CreateWorkspace::new("analytics", "us-west-2", "PREMIUM", credentials_id, storage_id);
    request.deployment_name = Some("dbc-7".to_string());

    let created = account_client(&transport)
        .workspaces()
        .create(&request)
        .await
        .expect("create");

    assert_eq!(created.workspace_status, WorkspaceStatus::Provisioning);
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({
            "workspace_name": "analytics",
            "aws_region": "us-west-2",
            "pricing_tier": "PREMIUM",
            "credentials_id": credentials_id,
            "storage_configuration_id": storage_id,
            "deployment_name": "dbc-7",
        })
    );
}

#[tokio::test]
async fn bound_update_patches_and_replaces_record() {
    let transport = RecordingTransport::new();
    let network_id = Uuid::new_v4();
    let mut updated = workspace_json(7, "analytics", "RUNNING");
    updated["network_id"] = json!(network_id);
    transport.respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "analytics", "RUNNING"));
    transport.respond(Method::PATCH, &workspace_path(7), 200, updated);
    let workspaces = account_client(&transport).workspaces();

    let mut workspace = workspaces.get_by_id(7).await.expect("get").expect("present");
    workspace
        .update(&WorkspaceUpdate {
            network_id: Some(network_id),
            ..WorkspaceUpdate::default()
        })
        .await
        .expect("update");

    assert_eq!(workspace.network_id, Some(network_id));
    let patch = transport.last_request().expect("request");
    assert_eq!(patch.method, Method::PATCH);
    assert_eq!(patch.json(), &json!({"network_id": network_id}));
}

#[tokio::test]
async fn delete_uses_legacy_policy() {
    let transport = RecordingTransport::new();
    transport
        .respond_empty(Method::DELETE, &workspace_path(7), 202)
        .respond_empty(Method::DELETE, &workspace_path(8), 404);
    let workspaces = account_client(&transport).workspaces();

    workspaces.delete(7).await.expect("202 is accepted");
    let err = workspaces.delete(8).await.expect_err("404");
    assert!(matches!(err, Error::NotFound { resource_type: "workspace", .. }));
}

#[tokio::test]
async fn workspace_host_uses_deployment_name() {
    let transport = RecordingTransport::new();
    transport.respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "a", "RUNNING"));
    let workspace = account_client(&transport)
        .workspaces()
        .get_by_id(7)
        .await
        .expect("get")
        .expect("present");

    assert_eq!(workspace.workspace_host().expect("host"), "dbc-7.cloud.databricks.com");
}

#[tokio::test]
async fn workspace_host_requires_deployment_name() {
    let transport = RecordingTransport::new();
    let mut body = workspace_json(7, "a", "RUNNING");
    body.as_object_mut().expect("object").remove("deployment_name");
    transport.respond(Method::GET, &workspace_path(7), 200, body);
    let workspace = account_client(&transport)
        .workspaces()
        .get_by_id(7)
        .await
        .expect("get")
        .expect("present");

    assert!(matches!(workspace.workspace_host(), Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn workspace_client_comes_from_registry_cache() {
    let transport = RecordingTransport::new();
    transport.respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "a", "RUNNING"));
    let connector = RecordingConnector::new(transport.clone());
    let registry = ClientRegistry::with_parts(
        ClientConfig::default(),
        Arc::new(connector.clone()),
        Arc::new(StaticCredentials::new().with_fallback(test_auth())),
    );
    let workspace = account_client(&transport)
        .workspaces()
        .get_by_id(7)
        .await
        .expect("get")
        .expect("present");

    let first = workspace.workspace_client(&registry, None).expect("client");
    let second = registry
        .workspace("dbc-7.cloud.databricks.com", None)
        .expect("client");

    assert!(first.ptr_eq(&second));
    assert_eq!(first.host(), "dbc-7.cloud.databricks.com");
    assert_eq!(connector.connections().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn wait_on_provisioning_polls_until_running() {
    init_test_logging();
    let transport = RecordingTransport::new();
    transport
        .respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "a", "PROVISIONING"))
        .respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "a", "PROVISIONING"))
        .respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "a", "RUNNING"));
    let workspaces = account_client(&transport).workspaces();
    let mut workspace = Bound::new(provisioning_record(), workspaces);

    let started = tokio::time::Instant::now();
    workspace
        .wait_on_provisioning(&poll(10, Some(600)), &CancellationToken::new())
        .await
        .expect("wait");

    assert_eq!(workspace.workspace_status, WorkspaceStatus::Running);
    assert_eq!(transport.requests_to(&Method::GET, &workspace_path(7)).len(), 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(20) && elapsed < Duration::from_secs(21));
}

#[tokio::test(start_paused = true)]
async fn wait_on_provisioning_returns_immediately_when_not_provisioning() {
    let transport = RecordingTransport::new();
    transport.respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "a", "FAILED"));
    let mut workspace = Bound::new(provisioning_record(), account_client(&transport).workspaces());

    workspace
        .wait_on_provisioning(&poll(10, None), &CancellationToken::new())
        .await
        .expect("wait");

    assert_eq!(workspace.workspace_status, WorkspaceStatus::Failed);
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn wait_on_provisioning_times_out() {
    let transport = RecordingTransport::new();
    transport.respond(
        Method::GET,
        &workspace_path(7),
        200,
        workspace_json(7, "a", "PROVISIONING"),
    );
    let mut workspace = Bound::new(provisioning_record(), account_client(&transport).workspaces());

    let err = workspace
        .wait_on_provisioning(&poll(10, Some(25)), &CancellationToken::new())
        .await
        .expect_err("never leaves provisioning");

    match err {
        Error::Timeout { elapsed, .. } => {
            assert!(elapsed >= Duration::from_secs(25) && elapsed < Duration::from_secs(26));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(transport.requests().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn wait_on_provisioning_stops_when_cancelled() {
    let transport = RecordingTransport::new();
    transport.respond(
        Method::GET,
        &workspace_path(7),
        200,
        workspace_json(7, "a", "PROVISIONING"),
    );
    let mut workspace = Bound::new(provisioning_record(), account_client(&transport).workspaces());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = workspace
        .wait_on_provisioning(&poll(10, None), &cancel)
        .await
        .expect_err("cancelled");

    assert!(matches!(err, Error::Cancelled { .. }));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn refresh_after_delete_reports_resource_gone() {
    let transport = RecordingTransport::new();
    transport
        .respond(Method::GET, &workspace_path(7), 200, workspace_json(7, "a", "RUNNING"))
        .respond_empty(Method::GET, &workspace_path(7), 404);
    transport.respond_empty(Method::DELETE, &workspace_path(7), 200);
    let mut workspace = account_client(&transport)
        .workspaces()
        .get_by_id(7)
        .await
        .expect("get")
        .expect("present");

    workspace.delete().await.expect("delete");
    assert_eq!(workspace.workspace_name, "a");

    let err = workspace.refresh().await.expect_err("gone");
    assert!(matches!(err, Error::ResourceGone { resource_type: "workspace", .. }));
}
