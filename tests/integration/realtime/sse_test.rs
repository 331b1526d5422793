//! SSE integration tests
//!
//! These run a real server on an ephemeral port and read the event stream
//! with `reqwest`, since the stream stays open for the life of the test.

use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::time::Duration;

use restfeed::backend::permission::PredicateInput;
use restfeed::backend::{Operation, PermissionPolicy, ResourceOptions};
use restfeed::shared::Record;

use crate::common::*;

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(300);

fn changes(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn odd_ids_only(input: &PredicateInput<'_>) -> Vec<Value> {
    input
        .target
        .as_array()
        .map(|records| {
            records
                .iter()
                .filter(|r| r["id"].as_i64().is_some_and(|id| id % 2 == 1))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_collection_subscriber_receives_add() {
    let (registry, collection) = things_registry(numbered_records(), ResourceOptions::new()).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let mut reader = SseReader::connect(&format!("http://{}/things/subscribe", addr), None).await;
    wait_for_subscriptions(&state, 1).await;

    collection
        .add(Record::new().with("id", 111).with("value", "added"))
        .await;

    let frame = reader.next_event(WAIT).await;
    assert_eq!(frame.event.as_deref(), Some("add"));
    assert_eq!(frame.json(), json!({ "id": 111, "value": "added" }));
}

#[tokio::test]
async fn test_read_only_subscriber_receives_change() {
    let options = ResourceOptions::new().permissions(PermissionPolicy::allow([Operation::Read]));
    let (registry, collection) = things_registry(numbered_records(), options).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let mut reader = SseReader::connect(&format!("http://{}/things/subscribe", addr), None).await;
    wait_for_subscriptions(&state, 1).await;

    collection
        .save("101", &changes(json!({ "value": "saved" })))
        .await
        .unwrap();

    let frame = reader.next_event(WAIT).await;
    assert_eq!(frame.event.as_deref(), Some("change"));
    assert_eq!(frame.json(), json!({ "id": 101, "value": "saved" }));
}

#[tokio::test]
async fn test_filtered_subscriber_gets_identity_only_removal() {
    let options = ResourceOptions::new()
        .permissions(PermissionPolicy::predicates().on(Operation::Read, odd_ids_only));
    let (registry, collection) = things_registry(numbered_records(), options).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let mut reader = SseReader::connect(&format!("http://{}/things/subscribe", addr), None).await;
    wait_for_subscriptions(&state, 1).await;

    // An even record is outside the visible set: its change is withheld.
    collection
        .save("102", &changes(json!({ "value": "hidden" })))
        .await
        .unwrap();
    reader.expect_silence(QUIET).await;

    collection.remove("102").await;

    let frame = reader.next_event(WAIT).await;
    assert_eq!(frame.event.as_deref(), Some("remove"));
    assert_eq!(frame.json(), json!({ "id": 102 }));
}

#[tokio::test]
async fn test_record_subscriber_receives_change_then_destroy() {
    let (registry, collection) = things_registry(numbered_records(), ResourceOptions::new()).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let mut reader = SseReader::connect(&format!("http://{}/things/103/subscribe", addr), None).await;
    wait_for_subscriptions(&state, 1).await;

    // Other records do not reach a record subscription.
    collection
        .save("104", &changes(json!({ "value": "other" })))
        .await
        .unwrap();
    collection
        .save("103", &changes(json!({ "value": "mine" })))
        .await
        .unwrap();

    let change = reader.next_event(WAIT).await;
    assert_eq!(change.event.as_deref(), Some("change"));
    assert_eq!(change.json()["value"], json!("mine"));

    collection.destroy("103").await.unwrap();

    let destroy = reader.next_event(WAIT).await;
    assert_eq!(destroy.event.as_deref(), Some("destroy"));
    assert_eq!(destroy.json()["id"], json!(103));
}

#[tokio::test]
async fn test_collection_subscriber_sees_remove_after_http_delete() {
    let (registry, _) = things_registry(numbered_records(), ResourceOptions::new()).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let mut reader = SseReader::connect(&format!("http://{}/things/subscribe", addr), None).await;
    wait_for_subscriptions(&state, 1).await;

    let response = reqwest::Client::new()
        .delete(format!("http://{}/things/105", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let frame = reader.next_event(WAIT).await;
    assert_eq!(frame.event.as_deref(), Some("remove"));
    assert_eq!(frame.json()["id"], json!(105));
}

#[tokio::test]
async fn test_http_create_is_streamed_as_add() {
    let (registry, _) = things_registry(numbered_records(), ResourceOptions::new()).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let mut reader = SseReader::connect(&format!("http://{}/things/subscribe", addr), None).await;
    wait_for_subscriptions(&state, 1).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/things", addr))
        .json(&json!({ "id": 120, "value": "posted" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::PARTIAL_CONTENT);

    let frame = reader.next_event(WAIT).await;
    assert_eq!(frame.event.as_deref(), Some("add"));
    assert_eq!(frame.json(), json!({ "id": 120, "value": "posted" }));
}

#[tokio::test]
async fn test_denied_subscription_is_403() {
    let options = ResourceOptions::new().permissions(PermissionPolicy::Deny);
    let (registry, collection) = things_registry(numbered_records(), options).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let response = request(&format!("http://{}/things/subscribe", addr), None).await;

    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    assert_eq!(state.broadcaster.active_subscriptions(), 0);
    assert_eq!(collection.listener_count(), 0);
}

#[tokio::test]
async fn test_subscription_to_missing_record_is_404() {
    let (registry, _) = things_registry(numbered_records(), ResourceOptions::new()).await;
    let (addr, _) = spawn_server(registry, streaming_config(Duration::from_secs(20))).await;

    let response = request(&format!("http://{}/things/999/subscribe", addr), None).await;

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_heartbeat_comment_is_sent() {
    let (registry, _) = things_registry(numbered_records(), ResourceOptions::new()).await;
    let (addr, _) = spawn_server(registry, streaming_config(Duration::from_millis(100))).await;

    let mut reader = SseReader::connect(&format!("http://{}/things/subscribe", addr), None).await;

    let frame = reader.next_frame(WAIT).await;
    assert_eq!(frame.event, None);
    assert_eq!(frame.comment.as_deref(), Some("keepAlive"));
}

#[tokio::test]
async fn test_disconnect_removes_subscription() {
    let (registry, collection) = things_registry(numbered_records(), ResourceOptions::new()).await;
    let (addr, state) = spawn_server(registry, streaming_config(Duration::from_millis(100))).await;

    let reader = SseReader::connect(&format!("http://{}/things/subscribe", addr), Some("alice")).await;
    wait_for_subscriptions(&state, 1).await;

    let subscriptions = state.broadcaster.subscriptions();
    assert_eq!(subscriptions[0].user.as_deref(), Some("alice"));
    assert_eq!(subscriptions[0].resource, "things");
    assert_eq!(collection.listener_count(), 1);

    drop(reader);

    // The server notices on its next write, at the latest the heartbeat.
    wait_for_subscriptions(&state, 0).await;
    assert_eq!(collection.listener_count(), 0);
}
