//! Offline inspection of visit log records.
//!
//! # Data Flow
//! ```text
//! Store::scan (page 1 → page 2 → … until no continuation key)
//!     → keep visit records only
//!     → sort by timestamp, newest first
//!     → truncate to limit
//!     → display.rs (text report)
//! ```

pub mod display;

use std::io::{self, Write};
use std::sync::Arc;

use crate::store::{Item, ScanRequest, Store, StoreError, StoreResult};
use crate::visits::VisitLogEntry;

pub use display::{render_report, truncate_chars, USER_AGENT_DISPLAY_CHARS};

/// Reads visit log entries from a table.
pub struct LogReader {
    store: Arc<dyn Store>,
}

impl LogReader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Scan every page of the table.
    pub async fn scan_all(&self) -> StoreResult<Vec<Item>> {
        let mut items = Vec::new();
        let mut request = ScanRequest::default();
        let mut pages = 0usize;

        loop {
            let page = self.store.scan(request.clone()).await?;
            pages += 1;
            items.extend(page.items);

            match page.last_evaluated_key {
                Some(key) => request.exclusive_start_key = Some(key),
                None => break,
            }
        }

        tracing::debug!(
            table = %self.store.table_name(),
            pages,
            items = items.len(),
            "Scan complete"
        );
        Ok(items)
    }

    /// The most recent visit entries, newest first, at most `limit` of them.
    pub async fn recent_visits(&self, limit: Option<usize>) -> StoreResult<Vec<VisitLogEntry>> {
        let items = self.scan_all().await?;
        Ok(select_recent(&items, limit))
    }
}

/// Print the most recent visits from `store` to `out`.
///
/// A store failure is reported on `out` as a single line and is not an error;
/// only failures writing to `out` are returned.
pub async fn run<W: Write>(store: Arc<dyn Store>, limit: Option<usize>, out: &mut W) -> io::Result<()> {
    match LogReader::new(store).recent_visits(limit).await {
        Ok(entries) => render_report(out, &entries)?,
        Err(e) => report_error(out, &e)?,
    }
    out.flush()
}

/// The line printed in place of a report when the table cannot be read.
pub fn report_error<W: Write>(out: &mut W, error: &StoreError) -> io::Result<()> {
    tracing::debug!(operation = error.operation(), error = %error, "Store read failed");
    writeln!(out, "Error reading from store: {}", error)
}

/// Filter, sort and truncate scanned items.
pub fn select_recent(items: &[Item], limit: Option<usize>) -> Vec<VisitLogEntry> {
    let mut entries: Vec<VisitLogEntry> = items.iter().filter_map(VisitLogEntry::from_item).collect();

    // Stable: entries with equal timestamps keep scan order.
    entries.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));

    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}
