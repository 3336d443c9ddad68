//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace layers)
//!     → request.rs (visitor identity from headers)
//!     → handler.rs (count visit via the injected store)
//!     → response.rs (JSON body + CORS header)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
