//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the counter and health handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use axum::{middleware, routing::any, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::CounterConfig;
use crate::http::handler::{count_visit, health};
use crate::http::response::timeout_as_json;
use crate::store::Store;
use crate::visits::{Clock, SystemClock, VisitCounter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub counter: VisitCounter,
}

/// HTTP server for the visitor counter.
pub struct HttpServer {
    router: Router,
    config: CounterConfig,
}

impl HttpServer {
    /// Create a new HTTP server counting visits in `store`.
    pub fn new(config: CounterConfig, store: Arc<dyn Store>) -> Self {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Create a server whose visit timestamps come from `clock`.
    pub fn with_clock(config: CounterConfig, store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        let state = AppState {
            counter: VisitCounter::with_clock(store, clock),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &CounterConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", any(health))
            .route("/", any(count_visit))
            .route("/{*path}", any(count_visit))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::map_response(timeout_as_json))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            table = %self.config.store.table_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }
}
