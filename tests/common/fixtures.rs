//! Resource fixtures
//!
//! Builders for collections, registries and servers used across the
//! integration suites.

use axum_test::TestServer;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use restfeed::backend::routes::create_router;
use restfeed::backend::{AppState, Collection, CollectionRegistry, MemoryStore, ResourceOptions};
use restfeed::shared::{Record, ServerConfig};

/// Records with ids 101..=110, each with a `value` attribute
pub fn numbered_records() -> Vec<Record> {
    (101..=110)
        .map(|id| Record::new().with("id", id).with("value", format!("record {}", id)))
        .collect()
}

/// Build a record from a JSON object literal
pub fn record(value: Value) -> Record {
    Record::from_value(value).expect("fixture records are objects")
}

/// A collection at `url` holding `records`, backed by `store`
pub async fn collection_with(url: &str, store: Arc<MemoryStore>, records: Vec<Record>) -> Arc<Collection> {
    store.seed(url, "id", records).await;
    Arc::new(Collection::new(url, store))
}

/// A registry with one resource at `/things` over `records`
pub async fn things_registry(records: Vec<Record>, options: ResourceOptions) -> (CollectionRegistry, Arc<Collection>) {
    let store = Arc::new(MemoryStore::new());
    let collection = collection_with("/things", store, records).await;
    let mut registry = CollectionRegistry::new();
    registry
        .register(collection.clone(), options)
        .await
        .expect("fixture registration");
    (registry, collection)
}

/// In-process test server for `registry`
pub fn test_server(registry: CollectionRegistry) -> TestServer {
    let app = create_router(AppState::new(registry, ServerConfig::default()));
    TestServer::new(app).expect("test server")
}

/// Configuration with a short heartbeat for streaming tests
pub fn streaming_config(keep_alive: Duration) -> ServerConfig {
    ServerConfig::builder()
        .host("127.0.0.1")
        .port(0)
        .keep_alive(keep_alive)
        .build()
        .expect("valid config")
}

/// Serve `registry` on an ephemeral port
///
/// Returns the bound address and the state, so tests can inspect the live
/// subscription table.
pub async fn spawn_server(registry: CollectionRegistry, config: ServerConfig) -> (SocketAddr, AppState) {
    let state = AppState::new(registry, config);
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server");
    });
    (addr, state)
}

/// Wait until the broadcaster holds `expected` subscriptions
pub async fn wait_for_subscriptions(state: &AppState, expected: usize) {
    let result = tokio::time::timeout(Duration::from_secs(5), async {
        while state.broadcaster.active_subscriptions() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(
        result.is_ok(),
        "expected {} subscriptions, have {}",
        expected,
        state.broadcaster.active_subscriptions()
    );
}
