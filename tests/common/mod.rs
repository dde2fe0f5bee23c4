#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use realty_listings::app::{create_app, AppState};
use realty_listings::config::{Environment, Settings, StorageBackend};
use realty_listings::seed::seed_property_types;
use realty_listings::store::{InMemoryStore, PgStore};
use sqlx::PgPool;

/// Build a test `Settings` with in-memory storage and no startup seeding.
pub fn test_settings() -> Settings {
    Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".to_string(),
        storage_backend: StorageBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        cors_allow_origins: vec!["http://localhost:3000".to_string()],
        seed_on_startup: false,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The store is returned as well so tests can inspect what was persisted
/// without going through HTTP.
pub fn build_test_app() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(store.clone(), test_settings());
    (create_app(state), store)
}

/// Same as [`build_test_app`] with the default property types already seeded.
pub async fn build_seeded_app() -> (Router, Arc<InMemoryStore>) {
    let (app, store) = build_test_app();
    seed_property_types(store.as_ref())
        .await
        .expect("seeding the in-memory store cannot fail");
    (app, store)
}

/// Build the router over PostgreSQL with the default property types seeded.
pub async fn build_pg_app(pool: PgPool) -> Router {
    let store = Arc::new(PgStore::new(pool));
    seed_property_types(store.as_ref())
        .await
        .expect("seeding a freshly migrated database");
    let settings = Settings {
        storage_backend: StorageBackend::Postgres,
        ..test_settings()
    };
    create_app(AppState::new(store, settings))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
}
