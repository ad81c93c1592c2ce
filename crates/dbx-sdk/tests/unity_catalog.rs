//! Catalogs, schemas, metastores and metastore assignments.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;

use dbx_sdk::transport::Method;
use dbx_sdk::types::{
    Catalog, CatalogUpdate, CreateCatalog, CreateMetastore, CreateSchema, MetastoreAssignment,
    MetastoreUpdate, SchemaRef, SchemaUpdate,
};
use dbx_sdk::Error;
use dbx_test_utils::{
    catalog_json, metastore_json, schema_json, workspace_client, RecordingTransport, METASTORE_ID,
};
use serde_json::json;
use uuid::Uuid;

const CATALOGS: &str = "api/2.1/unity-catalog/catalogs";
const SCHEMAS: &str = "api/2.1/unity-catalog/schemas";
const METASTORES: &str = "api/2.1/unity-catalog/metastores";

#[tokio::test]
async fn lists_are_empty_on_404_or_missing_field() {
    let transport = RecordingTransport::new();
    transport.respond(Method::GET, SCHEMAS, 200, json!({}));
    let catalog = workspace_client(&transport).unity_catalog();

    assert!(catalog.catalogs().list().await.expect("catalogs").is_empty());
    assert!(catalog.schemas().list("main").await.expect("schemas").is_empty());
    assert!(catalog.metastores().list().await.expect("metastores").is_empty());
    assert_eq!(
        transport.requests_to(&Method::GET, SCHEMAS)[0].query_param("catalog_name"),
        Some("main")
    );
}

#[tokio::test]
async fn catalog_get_by_name_round_trips_wire_record() {
    let transport = RecordingTransport::new();
    let body = catalog_json("main");
    transport.respond(Method::GET, &format!("{CATALOGS}/main"), 200, body.clone());
    let catalogs = workspace_client(&transport).unity_catalog().catalogs();

    let found = catalogs.get_by_name("main").await.expect("get").expect("present");
    let expected: Catalog = serde_json::from_value(body.clone()).expect("decode");
    assert_eq!(found, expected);
    assert_eq!(serde_json::to_value(&found).expect("encode"), body);

    assert!(catalogs.get_by_name("missing").await.expect("get").is_none());
}

#[tokio::test]
async fn catalog_create_sends_provided_fields_only() {
    let transport = RecordingTransport::new();
    transport.respond(Method::POST, CATALOGS, 200, catalog_json("sales"));
    let mut request = CreateCatalog::new("sales");
    request.comment = Some("Sales data".to_string());
    request.properties = Some(BTreeMap::from([("team".to_string(), "revenue".to_string())]));

    let created = workspace_client(&transport)
        .unity_catalog()
        .catalogs()
        .create(&request)
        .await
        .expect("create");

    assert_eq!(created.name, "sales");
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({"name": "sales", "comment": "Sales data", "properties": {"team": "revenue"}})
    );
}

#[tokio::test]
async fn catalog_rename_replaces_bound_record() {
    let transport = RecordingTransport::new();
    transport.respond(Method::GET, &format!("{CATALOGS}/main"), 200, catalog_json("main"));
    transport.respond(Method::PATCH, &format!("{CATALOGS}/main"), 200, catalog_json("primary"));
    let catalogs = workspace_client(&transport).unity_catalog().catalogs();

    let mut catalog = catalogs.get_by_name("main").await.expect("get").expect("present");
    catalog
        .update(&CatalogUpdate {
            name: Some("primary".to_string()),
            ..CatalogUpdate::default()
        })
        .await
        .expect("update");

    assert_eq!(catalog.name, "primary");
    assert_eq!(transport.last_request().expect("request").json(), &json!({"name": "primary"}));
}

#[tokio::test]
async fn catalog_update_reads_record_from_patch_only() {
    let transport = RecordingTransport::new();
    let path = format!("{CATALOGS}/main");
    transport
        .respond(Method::PATCH, &path, 200, catalog_json("main"))
        .respond(Method::PATCH, &path, 204, json!({}));
    let catalogs = workspace_client(&transport).unity_catalog().catalogs();
    let changes = CatalogUpdate {
        comment: Some("raw data".to_string()),
        ..CatalogUpdate::default()
    };

    let updated = catalogs.update("main", &changes).await.expect("update");
    assert_eq!(updated.name, "main");
    assert_eq!(transport.requests().len(), 1);

    let err = catalogs.update("main", &changes).await.expect_err("204");
    assert!(matches!(err, Error::UnexpectedResponse { status: 204, .. }));
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn catalog_delete_passes_force_and_is_strict() {
    let transport = RecordingTransport::new();
    let path = format!("{CATALOGS}/main");
    transport.respond(Method::GET, &path, 200, catalog_json("main"));
    transport
        .respond(Method::DELETE, &path, 200, json!({}))
        .respond(Method::DELETE, &path, 200, json!({}))
        .respond_empty(Method::DELETE, &path, 404);
    let catalog = workspace_client(&transport)
        .unity_catalog()
        .catalogs()
        .get_by_name("main")
        .await
        .expect("get")
        .expect("present");

    catalog.delete().await.expect("delete");
    catalog.force_delete().await.expect("force delete");
    let err = catalog.delete().await.expect_err("404");
    assert!(matches!(err, Error::UnexpectedResponse { status: 404, .. }));

    let forces: Vec<_> = transport
        .requests_to(&Method::DELETE, &path)
        .iter()
        .map(|r| r.query_param("force").map(str::to_string))
        .collect();
    assert_eq!(
        forces,
        vec![Some("false".to_string()), Some("true".to_string()), Some("false".to_string())]
    );
}

#[tokio::test]
async fn schema_lookup_uses_dotted_full_name() {
    let transport = RecordingTransport::new();
    transport.respond(Method::GET, &format!("{SCHEMAS}/main.raw"), 200, schema_json("main", "raw"));
    let schemas = workspace_client(&transport).unity_catalog().schemas();

    let schema = schemas.get_by_name("main", "raw").await.expect("get").expect("present");
    assert_eq!(schema.reference(), SchemaRef::new("main", "raw"));
    assert_eq!(schema.full_name.as_deref(), Some("main.raw"));
    assert!(schemas.get_by_name("main", "gone").await.expect("get").is_none());
}

#[tokio::test]
async fn schema_create_update_and_delete() {
    let transport = RecordingTransport::new();
    transport.respond(Method::POST, SCHEMAS, 200, schema_json("main", "raw"));
    let mut renamed = schema_json("main", "bronze");
    renamed["comment"] = json!("landing zone");
    transport.respond(Method::PATCH, &format!("{SCHEMAS}/main.raw"), 200, renamed);
    transport.respond(Method::DELETE, &format!("{SCHEMAS}/main.bronze"), 200, json!({}));
    let schemas = workspace_client(&transport).unity_catalog().schemas();

    let mut schema = schemas
        .create(&CreateSchema::new("main", "raw"))
        .await
        .expect("create");
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({"catalog_name": "main", "name": "raw"})
    );

    schema
        .update(&SchemaUpdate {
            name: Some("bronze".to_string()),
            comment: Some("landing zone".to_string()),
            ..SchemaUpdate::default()
        })
        .await
        .expect("update");
    assert_eq!(schema.reference(), SchemaRef::new("main", "bronze"));
    assert_eq!(schema.comment.as_deref(), Some("landing zone"));

    schema.force_delete().await.expect("delete");
    assert_eq!(
        transport.last_request().expect("request").query_param("force"),
        Some("true")
    );
}

#[tokio::test]
async fn metastore_crud() {
    let transport = RecordingTransport::new();
    let id_path = format!("{METASTORES}/{METASTORE_ID}");
    transport.respond(Method::POST, METASTORES, 200, metastore_json(METASTORE_ID, "primary"));
    let mut updated = metastore_json(METASTORE_ID, "primary");
    updated["owner"] = json!("platform-admins");
    transport.respond(Method::PATCH, &id_path, 200, updated);
    transport.respond(Method::DELETE, &id_path, 200, json!({}));
    transport.respond(
        Method::GET,
        METASTORES,
        200,
        json!({"metastores": [metastore_json(Uuid::new_v4(), "other"), metastore_json(METASTORE_ID, "primary")]}),
    );
    let metastores = workspace_client(&transport).unity_catalog().metastores();

    let mut metastore = metastores
        .create(&CreateMetastore {
            name: "primary".to_string(),
            storage_root: "s3://metastore-root/".to_string(),
            region: None,
        })
        .await
        .expect("create");
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({"name": "primary", "storage_root": "s3://metastore-root/"})
    );

    metastore
        .update(&MetastoreUpdate {
            owner: Some("platform-admins".to_string()),
            ..MetastoreUpdate::default()
        })
        .await
        .expect("update");
    assert_eq!(metastore.owner.as_deref(), Some("platform-admins"));
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({"owner": "platform-admins"})
    );

    let by_name = metastores.get_by_name("primary").await.expect("get").expect("present");
    assert_eq!(by_name.metastore_id, METASTORE_ID);

    metastore.delete().await.expect("delete");
    assert!(metastores.get_by_id(METASTORE_ID).await.expect("get").is_none());
}

#[tokio::test]
async fn metastore_assignments() {
    let transport = RecordingTransport::new();
    let assignment_path = "api/2.1/unity-catalog/workspaces/7/metastore";
    transport.respond(Method::PUT, assignment_path, 200, json!({}));
    transport.respond(Method::PATCH, assignment_path, 200, json!({}));
    transport.respond(Method::DELETE, assignment_path, 200, json!({}));
    let metastores = workspace_client(&transport).unity_catalog().metastores();

    assert!(metastores.current_assignment().await.expect("current").is_none());

    let created = metastores
        .create_assignment(7, METASTORE_ID, "main")
        .await
        .expect("assign");
    assert_eq!(
        created,
        MetastoreAssignment {
            workspace_id: 7,
            metastore_id: METASTORE_ID,
            default_catalog_name: Some("main".to_string()),
        }
    );
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({"metastore_id": METASTORE_ID, "default_catalog_name": "main"})
    );

    let updated = metastores
        .update_assignment(7, METASTORE_ID, None)
        .await
        .expect("update");
    assert_eq!(updated.default_catalog_name, None);
    assert_eq!(
        transport.last_request().expect("request").json(),
        &json!({"metastore_id": METASTORE_ID})
    );

    metastores.delete_assignment(7, METASTORE_ID).await.expect("unassign");
    let delete = transport.last_request().expect("request");
    assert_eq!(delete.method, Method::DELETE);
    assert_eq!(delete.json(), &json!({"metastore_id": METASTORE_ID}));
}

#[tokio::test]
async fn current_assignment_reads_record() {
    let transport = RecordingTransport::new();
    transport.respond(
        Method::GET,
        "api/2.1/unity-catalog/current-metastore-assignment",
        200,
        json!({"workspace_id": 7, "metastore_id": METASTORE_ID, "default_catalog_name": "main"}),
    );

    let assignment = workspace_client(&transport)
        .unity_catalog()
        .metastores()
        .current_assignment()
        .await
        .expect("current")
        .expect("assigned");

    assert_eq!(assignment.workspace_id, 7);
    assert_eq!(assignment.default_catalog_name.as_deref(), Some("main"));
}
