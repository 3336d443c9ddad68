//! Table persisted as a JSON snapshot on disk.
//!
//! # Responsibilities
//! - Load `<data_dir>/<table>.json` into a [`MemoryStore`] on open
//! - Rewrite the snapshot after every mutation
//!
//! # Design Decisions
//! - Snapshots are written to a temp file and renamed into place
//! - One writer process per table; readers in other processes see the last snapshot

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::validation::is_valid_table_name;
use crate::store::{Item, MemoryStore, ScanPage, ScanRequest, Store, StoreError, StoreResult};

/// File-backed table.
pub struct FileStore {
    table: MemoryStore,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open the table under `data_dir`, starting empty if no snapshot exists yet.
    pub async fn open(data_dir: impl AsRef<Path>, table_name: &str) -> StoreResult<Self> {
        check_table_name(table_name)?;
        let path = snapshot_path(data_dir.as_ref(), table_name);
        let table = match tokio::fs::try_exists(&path).await {
            Ok(true) => load_snapshot(&path, table_name).await?,
            Ok(false) => MemoryStore::new(table_name),
            Err(e) => return Err(StoreError::operation_failed("open", table_name, e)),
        };

        tracing::debug!(path = %path.display(), items = table.len(), "Loaded table snapshot");
        Ok(Self {
            table,
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Open a table that must already have a snapshot on disk.
    pub async fn open_existing(data_dir: impl AsRef<Path>, table_name: &str) -> StoreResult<Self> {
        check_table_name(table_name)?;
        let path = snapshot_path(data_dir.as_ref(), table_name);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StoreError::operation_failed(
                "open",
                table_name,
                format!("table not found at {}", path.display()),
            ));
        }
        Self::open(data_dir, table_name).await
    }

    /// Cap the number of items returned by a single scan page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.table = self.table.with_page_size(page_size);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, operation: &'static str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let table_name = self.table.table_name();
        let fail = |e: &dyn std::fmt::Display| StoreError::operation_failed(operation, table_name, e);

        let bytes = serde_json::to_vec_pretty(&self.table.snapshot()).map_err(|e| fail(&e))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| fail(&e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(|e| fail(&e))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| fail(&e))?;
        Ok(())
    }
}

#[async_trait]
impl Store for FileStore {
    fn table_name(&self) -> &str {
        self.table.table_name()
    }

    async fn add_to_counter(
        &self,
        key: &str,
        attribute: &str,
        delta: i64,
        record_type: &str,
    ) -> StoreResult<i64> {
        let updated = self.table.add(key, attribute, delta, record_type)?;
        self.persist("add_to_counter").await?;
        Ok(updated)
    }

    async fn put_item(&self, item: Item) -> StoreResult<()> {
        self.table.put(item);
        self.persist("put_item").await
    }

    async fn scan(&self, request: ScanRequest) -> StoreResult<ScanPage> {
        Ok(self.table.scan_page(&request))
    }
}

/// Table names become file names, so they must stay inside `data_dir`.
fn check_table_name(table_name: &str) -> StoreResult<()> {
    if is_valid_table_name(table_name) {
        Ok(())
    } else {
        Err(StoreError::operation_failed(
            "open",
            table_name,
            "table name must be 3-255 characters of [A-Za-z0-9_.-]",
        ))
    }
}

fn snapshot_path(data_dir: &Path, table_name: &str) -> PathBuf {
    data_dir.join(format!("{}.json", table_name))
}

async fn load_snapshot(path: &Path, table_name: &str) -> StoreResult<MemoryStore> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| StoreError::operation_failed("open", table_name, e))?;
    let items: Vec<Item> = serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::operation_failed("open", table_name, e))?;
    Ok(MemoryStore::from_items(table_name, items))
}
