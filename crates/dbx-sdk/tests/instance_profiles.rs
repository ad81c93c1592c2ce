//! Instance profile client.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use dbx_sdk::transport::Method;
use dbx_sdk::types::{CreateInstanceProfile, EditInstanceProfile};
use dbx_sdk::Error;
use dbx_test_utils::{instance_profile_json, workspace_client, RecordingTransport};
use serde_json::json;

const LIST: &str = "api/2.0/instance-profiles/list";
const ADD: &str = "api/2.0/instance-profiles/add";
const EDIT: &str = "api/2.0/instance-profiles/edit";
const REMOVE: &str = "api/2.0/instance-profiles/remove";

const ARN: &str = "arn:aws:iam::123456789012:instance-profile/etl";

#[tokio::test]
async fn get_matches_full_arn_or_trailing_name() {
    let transport = RecordingTransport::new();
    transport.respond(
        Method::GET,
        LIST,
        200,
        json!({"instance_profiles": [
            instance_profile_json("arn:aws:iam::123456789012:instance-profile/other-etl"),
            instance_profile_json(ARN),
        ]}),
    );
    let profiles = workspace_client(&transport).instance_profiles();

    let by_name = profiles.get("etl").await.expect("get").expect("present");
    assert_eq!(by_name.instance_profile_arn, ARN);
    let by_arn = profiles.get(ARN).await.expect("get").expect("present");
    assert_eq!(by_arn, by_name);
    assert!(profiles.get("tl").await.expect("get").is_none());
}

#[tokio::test]
async fn list_404_is_empty() {
    let transport = RecordingTransport::new();
    let profiles = workspace_client(&transport).instance_profiles();
    assert!(profiles.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn create_echoes_request() {
    let transport = RecordingTransport::new();
    transport.respond(Method::POST, ADD, 200, json!({}));
    let mut request = CreateInstanceProfile::new(ARN);
    request.skip_validation = true;

    let created = workspace_client(&transport)
        .instance_profiles()
        .create(&request)
        .await
        .expect("create");

    assert_eq!(created.instance_profile_arn, ARN);
    assert!(!created.is_meta_instance_profile);
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({
            "instance_profile_arn": ARN,
            "is_meta_instance_profile": false,
            "skip_validation": true,
        })
    );
}

#[tokio::test]
async fn create_rejects_other_statuses() {
    let transport = RecordingTransport::new();
    transport.respond(Method::POST, ADD, 409, json!({"error_code": "RESOURCE_ALREADY_EXISTS"}));

    let err = workspace_client(&transport)
        .instance_profiles()
        .create(&CreateInstanceProfile::new(ARN))
        .await
        .expect_err("409");

    assert!(matches!(err, Error::UnexpectedResponse { status: 409, .. }));
}

#[tokio::test]
async fn bound_update_edits_then_rereads() {
    let transport = RecordingTransport::new();
    let mut meta = instance_profile_json(ARN);
    meta["is_meta_instance_profile"] = json!(true);
    transport
        .respond(Method::GET, LIST, 200, json!({"instance_profiles": [instance_profile_json(ARN)]}))
        .respond(Method::GET, LIST, 200, json!({"instance_profiles": [meta]}));
    transport.respond(Method::POST, EDIT, 200, json!({}));
    let profiles = workspace_client(&transport).instance_profiles();

    let mut profile = profiles.get("etl").await.expect("get").expect("present");
    profile
        .update(&EditInstanceProfile {
            is_meta_instance_profile: Some(true),
            ..EditInstanceProfile::default()
        })
        .await
        .expect("update");

    assert!(profile.is_meta_instance_profile);
    assert_eq!(
        transport.requests_to(&Method::POST, EDIT)[0].json(),
        &json!({"instance_profile_arn": ARN, "is_meta_instance_profile": true})
    );
}

#[tokio::test]
async fn delete_posts_arn_and_is_strict() {
    let transport = RecordingTransport::new();
    transport.respond(Method::POST, REMOVE, 200, json!({}));
    transport.respond(Method::GET, LIST, 200, json!({"instance_profiles": [instance_profile_json(ARN)]}));
    let profile = workspace_client(&transport)
        .instance_profiles()
        .get(ARN)
        .await
        .expect("get")
        .expect("present");

    profile.delete().await.expect("delete");
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({"instance_profile_arn": ARN})
    );

    let failing = RecordingTransport::new();
    failing.respond_empty(Method::POST, REMOVE, 204);
    let err = workspace_client(&failing)
        .instance_profiles()
        .delete(ARN)
        .await
        .expect_err("204");
    assert!(matches!(err, Error::UnexpectedResponse { status: 204, .. }));
}
