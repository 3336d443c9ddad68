//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use tokio::net::TcpListener;

use visitor_counter::config::CounterConfig;
use visitor_counter::http::HttpServer;
use visitor_counter::lifecycle::Shutdown;
use visitor_counter::store::{
    Item, MemoryStore, ScanPage, ScanRequest, Store, StoreError, StoreResult,
};

/// A table that fails selected operations on demand.
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    pub fail_add: Arc<AtomicBool>,
    pub fail_put: Arc<AtomicBool>,
    pub fail_scan: Arc<AtomicBool>,
    /// Milliseconds to stall before each `add_to_counter`.
    pub add_delay_ms: Arc<AtomicU64>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new("VisitorCounter"),
            fail_add: Arc::new(AtomicBool::new(false)),
            fail_put: Arc::new(AtomicBool::new(false)),
            fail_scan: Arc::new(AtomicBool::new(false)),
            add_delay_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    fn check(&self, flag: &AtomicBool, operation: &'static str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::operation_failed(operation, "VisitorCounter", "injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for FaultyStore {
    fn table_name(&self) -> &str {
        self.inner.table_name()
    }

    async fn add_to_counter(
        &self,
        key: &str,
        attribute: &str,
        delta: i64,
        record_type: &str,
    ) -> StoreResult<i64> {
        let delay = self.add_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check(&self.fail_add, "add_to_counter")?;
        self.inner.add_to_counter(key, attribute, delta, record_type).await
    }

    async fn put_item(&self, item: Item) -> StoreResult<()> {
        self.check(&self.fail_put, "put_item")?;
        self.inner.put_item(item).await
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<ScanPage> {
        self.check(&self.fail_scan, "scan")?;
        self.inner.scan(request).await
    }
}

/// Visit records currently in `table`.
pub fn visit_items(table: &MemoryStore) -> Vec<Item> {
    table
        .snapshot()
        .into_iter()
        .filter(|item| item.id.starts_with("ip:"))
        .collect()
}

/// GET `/` with the given headers.
pub fn visit_request(headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().uri("/");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Start a server on an ephemeral port.
pub async fn start_server(store: Arc<dyn Store>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(CounterConfig::default(), store);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
