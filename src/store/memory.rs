//! In-process table backed by a concurrent map.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::{
    AttributeValue, Item, ScanPage, ScanRequest, Store, StoreError, StoreResult,
    RECORD_TYPE_ATTRIBUTE,
};

/// Largest page a scan returns when the caller sets no smaller limit.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// A thread-safe table held in memory.
///
/// Counter updates run under the map's entry lock, so concurrent adds to the
/// same key never lose an update. Clones share the same underlying table.
#[derive(Clone)]
pub struct MemoryStore {
    table_name: String,
    inner: Arc<DashMap<String, Item>>,
    page_size: usize,
}

impl MemoryStore {
    /// Create an empty table.
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            inner: Arc::new(DashMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Cap the number of items returned by a single scan page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Create a table pre-populated with `items`.
    pub fn from_items(table_name: &str, items: impl IntoIterator<Item = Item>) -> Self {
        let store = Self::new(table_name);
        for item in items {
            store.inner.insert(item.id.clone(), item);
        }
        store
    }

    /// Fetch an item by id.
    pub fn get(&self, id: &str) -> Option<Item> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    /// All items in key order.
    pub fn snapshot(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.inner.iter().map(|r| r.value().clone()).collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        items
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub(crate) fn add(
        &self,
        key: &str,
        attribute: &str,
        delta: i64,
        record_type: &str,
    ) -> StoreResult<i64> {
        let mut entry = self.inner.entry(key.to_string()).or_insert_with(|| {
            Item::new(key).with(RECORD_TYPE_ATTRIBUTE, record_type)
        });

        let current = match entry.attributes.get(attribute) {
            None => 0,
            Some(AttributeValue::N(n)) => *n,
            Some(AttributeValue::S(_)) => {
                return Err(StoreError::operation_failed(
                    "add_to_counter",
                    &self.table_name,
                    format!("attribute '{}' of '{}' is not a number", attribute, key),
                ));
            }
        };

        let updated = current.checked_add(delta).ok_or_else(|| {
            StoreError::operation_failed(
                "add_to_counter",
                &self.table_name,
                format!("attribute '{}' of '{}' would overflow", attribute, key),
            )
        })?;

        entry
            .attributes
            .insert(attribute.to_string(), AttributeValue::N(updated));
        Ok(updated)
    }

    pub(crate) fn put(&self, item: Item) {
        self.inner.insert(item.id.clone(), item);
    }

    pub(crate) fn scan_page(&self, request: &ScanRequest) -> ScanPage {
        let limit = request
            .limit
            .map_or(self.page_size, |l| l.clamp(1, self.page_size));

        let mut keys: Vec<String> = self
            .inner
            .iter()
            .map(|r| r.key().clone())
            .filter(|k| match &request.exclusive_start_key {
                Some(start) => k > start,
                None => true,
            })
            .collect();
        keys.sort();

        let has_more = keys.len() > limit;
        keys.truncate(limit);

        // Items deleted between the key listing and the lookup are skipped.
        let items: Vec<Item> = keys
            .iter()
            .filter_map(|k| self.inner.get(k).map(|r| r.value().clone()))
            .collect();

        let last_evaluated_key = if has_more { keys.last().cloned() } else { None };
        ScanPage {
            items,
            last_evaluated_key,
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    async fn add_to_counter(
        &self,
        key: &str,
        attribute: &str,
        delta: i64,
        record_type: &str,
    ) -> StoreResult<i64> {
        self.add(key, attribute, delta, record_type)
    }

    async fn put_item(&self, item: Item) -> StoreResult<()> {
        self.put(item);
        Ok(())
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<ScanPage> {
        Ok(self.scan_page(&request))
    }
}
