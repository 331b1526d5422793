//! CRUD integration tests
//!
//! Exercises the five resource routes against an in-memory store.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

use restfeed::backend::{Collection, CollectionRegistry, MemoryStore, ResourceOptions};
use restfeed::shared::Record;

use crate::common::*;
use crate::{assert_error_body, assert_ids};

async fn things_server() -> axum_test::TestServer {
    let (registry, _) = things_registry(numbered_records(), ResourceOptions::new()).await;
    test_server(registry)
}

#[tokio::test]
async fn test_list_returns_every_record() {
    let server = things_server().await;

    let response = server.get("/things").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_ids!(body, [101, 102, 103, 104, 105, 106, 107, 108, 109, 110]);
}

#[tokio::test]
async fn test_list_with_trailing_slash() {
    let server = things_server().await;

    let response = server.get("/things/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>().as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn test_read_single_record_by_numeric_id() {
    let server = things_server().await;

    let response = server.get("/things/102").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "id": 102, "value": "record 102" }));
}

#[tokio::test]
async fn test_read_missing_record_is_404() {
    let server = things_server().await;

    let response = server.get("/things/999").await;

    assert_error_body!(response, StatusCode::NOT_FOUND, "Model 999 does not exist.");
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let server = things_server().await;

    let first: Value = server.get("/things").await.json();
    let second: Value = server.get("/things").await.json();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_create_returns_206_and_is_readable() {
    let server = things_server().await;

    let response = server
        .post("/things")
        .json(&json!({ "id": 111, "value": "new" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.json::<Value>(), json!({ "id": 111 }));

    let read = server.get("/things/111").await;
    assert_eq!(read.status_code(), StatusCode::OK);
    assert_eq!(read.json::<Value>()["value"], json!("new"));
}

#[tokio::test]
async fn test_create_duplicate_is_422() {
    let server = things_server().await;

    let response = server
        .post("/things")
        .json(&json!({ "id": 101, "value": "again" }))
        .await;

    assert_error_body!(response, StatusCode::UNPROCESSABLE_ENTITY, "Model 101 already exists.");
}

#[tokio::test]
async fn test_create_failing_validation_is_422() {
    let store = Arc::new(MemoryStore::new());
    let collection = Arc::new(
        Collection::new("/things", store).with_validator(|record: &Record| {
            if record.get("value").is_some() {
                Ok(())
            } else {
                Err("value is required".to_string())
            }
        }),
    );
    let mut registry = CollectionRegistry::new();
    registry.register(collection, ResourceOptions::new()).await.unwrap();
    let server = test_server(registry);

    let response = server.post("/things").json(&json!({ "id": 1 })).await;

    assert_error_body!(response, StatusCode::UNPROCESSABLE_ENTITY, "value is required");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let server = things_server().await;

    let response = server
        .post("/things")
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{not json"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_merges_and_keeps_identity() {
    let server = things_server().await;

    let response = server
        .put("/things/103")
        .json(&json!({ "id": 999, "value": "changed", "extra": true }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.json::<Value>(), json!({ "id": 103 }));

    let read: Value = server.get("/things/103").await.json();
    assert_eq!(read, json!({ "id": 103, "value": "changed", "extra": true }));
    assert_eq!(server.get("/things/999").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_record_is_404() {
    let server = things_server().await;

    let response = server.put("/things/404").json(&json!({ "value": "x" })).await;

    assert_error_body!(response, StatusCode::NOT_FOUND, "Model 404 does not exist.");
}

#[tokio::test]
async fn test_delete_returns_204_then_404() {
    let server = things_server().await;

    let response = server.delete("/things/104").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let read = server.get("/things/104").await;
    assert_eq!(read.status_code(), StatusCode::NOT_FOUND);

    let list: Value = server.get("/things").await.json();
    assert_eq!(list.as_array().map(Vec::len), Some(9));
}

#[tokio::test]
async fn test_pick_and_omit_shape_reads() {
    let server = things_server().await;

    let picked: Value = server.get("/things/105").add_query_param("pick", "id").await.json();
    assert_eq!(picked, json!({ "id": 105 }));

    let omitted: Value = server.get("/things/105").add_query_param("omit", "value").await.json();
    assert_eq!(omitted, json!({ "id": 105 }));

    let listed: Value = server.get("/things").add_query_param("omit", "id").await.json();
    assert_eq!(listed[0], json!({ "value": "record 101" }));
}

#[tokio::test]
async fn test_where_key_filters_before_projection() {
    let server = things_server().await;

    let response = server
        .get("/things")
        .add_query_param("whereKey", "id")
        .add_query_param("whereValue", "107")
        .add_query_param("pick", "value")
        .await;

    assert_eq!(response.json::<Value>(), json!([{ "value": "record 107" }]));
}

#[tokio::test]
async fn test_percent_encoded_identity() {
    let store = Arc::new(MemoryStore::new());
    let collection = collection_with(
        "/files",
        store,
        vec![record(json!({ "id": "a b", "size": 1 }))],
    )
    .await;
    let mut registry = CollectionRegistry::new();
    registry.register(collection, ResourceOptions::new()).await.unwrap();
    let server = test_server(registry);

    let response = server.get("/files/a%20b").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["size"], json!(1));
}

#[tokio::test]
async fn test_custom_identity_attribute() {
    let store = Arc::new(MemoryStore::new());
    store
        .seed("/docs", "_id", vec![record(json!({ "_id": "abc", "title": "first" }))])
        .await;
    let collection = Arc::new(Collection::new("/docs", store).with_id_attribute("_id"));
    let mut registry = CollectionRegistry::new();
    registry.register(collection, ResourceOptions::new()).await.unwrap();
    let server = test_server(registry);

    let read = server.get("/docs/abc").await;
    assert_eq!(read.json::<Value>()["title"], json!("first"));

    let updated = server.put("/docs/abc").json(&json!({ "title": "second" })).await;
    assert_eq!(updated.status_code(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(updated.json::<Value>()["_id"], json!("abc"));
}

#[tokio::test]
async fn test_store_failure_is_500_with_generic_message() {
    let store = Arc::new(MemoryStore::new());
    let collection = collection_with("/things", store.clone(), numbered_records()).await;
    let mut registry = CollectionRegistry::new();
    registry.register(collection.clone(), ResourceOptions::new()).await.unwrap();
    let server = test_server(registry);
    store.set_fail_writes(true);

    let response = server.put("/things/101").json(&json!({ "value": "x" })).await;

    assert_error_body!(response, StatusCode::INTERNAL_SERVER_ERROR, "update error");
    let unchanged = collection.get("101").await.unwrap();
    assert_eq!(unchanged.get("value"), Some(&json!("record 101")));
}

async fn failing_store_server() -> (axum_test::TestServer, Arc<MemoryStore>, Arc<Collection>) {
    let store = Arc::new(MemoryStore::new());
    let collection = collection_with("/things", store.clone(), numbered_records()).await;
    let mut registry = CollectionRegistry::new();
    registry.register(collection.clone(), ResourceOptions::new()).await.unwrap();
    let server = test_server(registry);
    store.set_fail_writes(true);
    (server, store, collection)
}

#[tokio::test]
async fn test_create_store_failure_is_500() {
    let (server, store, collection) = failing_store_server().await;

    let response = server.post("/things").json(&json!({ "id": 111, "value": "new" })).await;

    assert_error_body!(response, StatusCode::INTERNAL_SERVER_ERROR, "create error");
    assert_eq!(collection.len().await, 10);
    assert!(collection.get("111").await.is_none());
    assert_eq!(store.count("/things").await, 10);
}

#[tokio::test]
async fn test_delete_store_failure_is_500() {
    let (server, store, collection) = failing_store_server().await;

    let response = server.delete("/things/106").await;

    assert_error_body!(response, StatusCode::INTERNAL_SERVER_ERROR, "delete error");
    assert!(collection.get("106").await.is_some());
    assert!(store.get("/things", "106").await.is_some());
}

#[tokio::test]
async fn test_update_failing_validation_is_422() {
    let store = Arc::new(MemoryStore::new());
    store.seed("/things", "id", numbered_records()).await;
    let collection = Arc::new(Collection::new("/things", store).with_validator(|record: &Record| {
        match record.get("value") {
            Some(serde_json::Value::String(_)) => Ok(()),
            _ => Err("value must be a string".to_string()),
        }
    }));
    let mut registry = CollectionRegistry::new();
    registry.register(collection.clone(), ResourceOptions::new()).await.unwrap();
    let server = test_server(registry);

    let response = server.put("/things/108").json(&json!({ "value": 5 })).await;

    assert_error_body!(response, StatusCode::UNPROCESSABLE_ENTITY, "value must be a string");
    let unchanged = collection.get("108").await.unwrap();
    assert_eq!(unchanged.get("value"), Some(&json!("record 108")));
}

#[tokio::test]
async fn test_non_object_body_is_400() {
    let server = things_server().await;

    let response = server.post("/things").json(&json!([1, 2, 3])).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(server.get("/things").await.json::<Value>().as_array().map(Vec::len), Some(10));
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let server = things_server().await;

    let response = server.get("/nothing/here").await;

    assert_error_body!(response, StatusCode::NOT_FOUND, "Not Found");
}

#[tokio::test]
async fn test_identity_header_is_accepted_without_policy() {
    let server = things_server().await;

    let response = server
        .get("/things/101")
        .add_header(HeaderName::from_static("x-user-id"), HeaderValue::from_static("alice"))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
