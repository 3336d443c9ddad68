//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the counter service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Table name used when neither the config file nor `TABLE_NAME` sets one.
pub const DEFAULT_TABLE_NAME: &str = "VisitorCounter";

/// Root configuration for the counter service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CounterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Table selection and backend.
    pub store: StoreConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Which table implementation backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local table; contents are lost on exit.
    #[default]
    Memory,
    /// JSON snapshot under `data_dir`, shared with the log reader.
    File,
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Table holding the counter and visit records.
    pub table_name: String,

    /// Table implementation.
    pub backend: StoreBackend,

    /// Directory for file-backed tables.
    pub data_dir: String,

    /// Maximum items per scan page.
    pub scan_page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            backend: StoreBackend::Memory,
            data_dir: "./data".to_string(),
            scan_page_size: 100,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: CounterConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_sections() {
        let config: CounterConfig = toml::from_str(
            r#"
            [store]
            backend = "file"
            data_dir = "/var/lib/visitors"

            [timeouts]
            request_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.data_dir, "/var/lib/visitors");
        assert_eq!(config.store.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.timeouts.request_secs, 5);
    }
}
