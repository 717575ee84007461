//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use blog_proxy::config::ProxyConfig;
use blog_proxy::http::HttpServer;
use blog_proxy::lifecycle::Shutdown;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// In-memory stand-in for the upstream document store.
///
/// Behaves like a plain REST store for `/blogs`, but can be told to answer
/// requests with a fixed status (globally or per method) or to stall before
/// answering.
#[derive(Default)]
pub struct MockStore {
    blogs: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    forced_status: Mutex<Option<u16>>,
    forced_by_method: Mutex<HashMap<Method, u16>>,
    delay_ms: AtomicU64,
    received: Mutex<Vec<Value>>,
    hits: AtomicUsize,
}

impl MockStore {
    /// Answer every subsequent request with `status` and an empty object.
    pub fn force_status(&self, status: u16) {
        *self.forced_status.lock().unwrap() = Some(status);
    }

    /// Answer requests with `method` only with `status`; a global
    /// [`force_status`](Self::force_status) still wins.
    pub fn force_status_for(&self, method: Method, status: u16) {
        self.forced_by_method.lock().unwrap().insert(method, status);
    }

    pub fn stall_for(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Put a document straight into the store, returning its id.
    pub fn seed(&self, mut document: Value) -> String {
        let id = self.assign_id();
        document["id"] = json!(id);
        self.blogs.lock().unwrap().push(document);
        id
    }

    /// Documents received in POST/PUT bodies, in arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    pub fn find(&self, id: &str) -> Option<Value> {
        self.blogs
            .lock()
            .unwrap()
            .iter()
            .find(|b| b["id"] == id)
            .cloned()
    }

    /// Number of requests that reached the store.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn assign_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    async fn intercept(&self, method: Method) -> Option<Response> {
        self.hits.fetch_add(1, Ordering::SeqCst);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let forced = *self.forced_status.lock().unwrap();
        let forced = forced.or_else(|| {
            let by_method = self.forced_by_method.lock().unwrap();
            by_method.get(&method).copied()
        });
        forced.map(|status| {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({}))).into_response()
        })
    }
}

type Store = Arc<MockStore>;

async fn list(State(store): State<Store>) -> Response {
    if let Some(resp) = store.intercept(Method::GET).await {
        return resp;
    }
    Json(Value::Array(store.blogs.lock().unwrap().clone())).into_response()
}

async fn create(State(store): State<Store>, Json(mut document): Json<Value>) -> Response {
    if let Some(resp) = store.intercept(Method::POST).await {
        return resp;
    }
    store.received.lock().unwrap().push(document.clone());
    document["id"] = json!(store.assign_id());
    store.blogs.lock().unwrap().push(document.clone());
    (StatusCode::CREATED, Json(document)).into_response()
}

async fn fetch(State(store): State<Store>, Path(id): Path<String>) -> Response {
    if let Some(resp) = store.intercept(Method::GET).await {
        return resp;
    }
    match store.find(&id) {
        Some(doc) => Json(doc).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn replace(
    State(store): State<Store>,
    Path(id): Path<String>,
    Json(document): Json<Value>,
) -> Response {
    if let Some(resp) = store.intercept(Method::PUT).await {
        return resp;
    }
    store.received.lock().unwrap().push(document.clone());
    let mut blogs = store.blogs.lock().unwrap();
    match blogs.iter_mut().find(|b| b["id"] == id.as_str()) {
        Some(slot) => {
            *slot = document.clone();
            Json(document).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn remove(State(store): State<Store>, Path(id): Path<String>) -> Response {
    if let Some(resp) = store.intercept(Method::DELETE).await {
        return resp;
    }
    let mut blogs = store.blogs.lock().unwrap();
    let before = blogs.len();
    blogs.retain(|b| b["id"] != id.as_str());
    if blogs.len() < before {
        Json(json!({})).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
    }
}

/// Start a mock document store on an ephemeral port.
pub async fn start_mock_store() -> (SocketAddr, Store) {
    let store: Store = Arc::new(MockStore::default());
    let app = Router::new()
        .route("/blogs", get(list).post(create))
        .route("/blogs/{id}", get(fetch).put(replace).delete(remove))
        .with_state(store.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, store)
}

/// An address nothing is listening on.
pub fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing at `upstream`, listening on an ephemeral port.
pub fn proxy_config(upstream: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{}", upstream);
    config
}

/// A running proxy. Shuts down when dropped.
pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestProxy { addr, shutdown }
}

/// HTTP client that never goes through a system proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
