//! Key-value table subsystem.
//!
//! # Data Flow
//! ```text
//! counter handler ──▶ add_to_counter ─┐
//!                 └─▶ put_item ───────┼──▶ Store (trait object)
//! log reader ───────▶ scan (paged) ───┘       ├── memory.rs (DashMap table)
//!                                             └── file.rs   (JSON snapshot on disk)
//! ```
//!
//! # Design Decisions
//! - Callers hold an `Arc<dyn Store>`; nothing in the crate reaches for a global handle
//! - Every operation fails with the single [`StoreError`] type
//! - Scans are paged with a continuation key so readers must follow pagination

pub mod error;
pub mod file;
pub mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::schema::{StoreBackend, StoreConfig};

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Name of the attribute that tags an item with its record type.
pub const RECORD_TYPE_ATTRIBUTE: &str = "record_type";

/// A single attribute value. Tables hold numbers and strings only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    N(i64),
    S(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            AttributeValue::N(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            AttributeValue::N(n) => Some(*n),
            AttributeValue::S(_) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::S(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::S(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::N(value)
    }
}

/// One row of the table, addressed by its string `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttributeValue::as_str)
    }

    pub fn get_number(&self, name: &str) -> Option<i64> {
        self.attributes.get(name).and_then(AttributeValue::as_number)
    }
}

/// Parameters for one scan page.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Resume after this key (exclusive). `None` starts from the beginning.
    pub exclusive_start_key: Option<String>,
    /// Maximum number of items in the page. `None` lets the table decide.
    pub limit: Option<usize>,
}

/// One page of scan results.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Set when more items may follow; pass it back as `exclusive_start_key`.
    pub last_evaluated_key: Option<String>,
}

/// Client contract for the key-value table.
#[async_trait]
pub trait Store: Send + Sync {
    /// Name of the table this handle is bound to.
    fn table_name(&self) -> &str;

    /// Atomically add `delta` to the numeric `attribute` of item `key`,
    /// creating the item (tagged with `record_type`) when it is absent.
    /// Returns the value after the update.
    async fn add_to_counter(
        &self,
        key: &str,
        attribute: &str,
        delta: i64,
        record_type: &str,
    ) -> StoreResult<i64>;

    /// Unconditionally write `item`, replacing any item with the same id.
    async fn put_item(&self, item: Item) -> StoreResult<()>;

    /// Return one page of items in key order.
    async fn scan(&self, request: ScanRequest) -> StoreResult<ScanPage>;
}

/// Open the table described by `config`.
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match config.backend {
        StoreBackend::Memory => Arc::new(
            MemoryStore::new(&config.table_name).with_page_size(config.scan_page_size),
        ),
        StoreBackend::File => {
            Arc::new(
                FileStore::open(&config.data_dir, &config.table_name)
                    .await?
                    .with_page_size(config.scan_page_size),
            )
        }
    };

    tracing::info!(
        table = %store.table_name(),
        backend = ?config.backend,
        "Store opened"
    );
    Ok(store)
}
