//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → TABLE_NAME environment override
//!     → validation.rs (semantic checks)
//!     → CounterConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::CounterConfig;
pub use schema::{ListenerConfig, ObservabilityConfig, StoreBackend, StoreConfig, TimeoutConfig};
