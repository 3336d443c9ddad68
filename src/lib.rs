//! Visitor counter: an HTTP endpoint that counts visits in a key-value table
//! and a reader for the per-visit log it leaves behind.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reader;
pub mod store;
pub mod visits;

pub use config::schema::CounterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{Store, StoreError};
