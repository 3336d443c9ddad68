//! Count a visit and append its log record.

use std::sync::Arc;

use crate::observability::metrics;
use crate::store::{Store, StoreResult};
use crate::visits::clock::{Clock, SystemClock};
use crate::visits::model::{
    VisitRecord, Visitor, COUNTER_KEY, COUNTER_RECORD_TYPE, COUNT_ATTRIBUTE,
};

/// Records visits against a table.
#[derive(Clone)]
pub struct VisitCounter {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl VisitCounter {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Increment the counter, then write one visit record.
    ///
    /// The two writes are independent: if the log write fails the counter
    /// keeps its increment. If the increment fails nothing is logged.
    pub async fn record_visit(&self, visitor: &Visitor) -> StoreResult<i64> {
        let count = self
            .store
            .add_to_counter(COUNTER_KEY, COUNT_ATTRIBUTE, 1, COUNTER_RECORD_TYPE)
            .await?;
        metrics::record_visitor_count(count);

        let record = VisitRecord::new(visitor, self.clock.now());
        tracing::debug!(key = %record.key(), "Writing visit record");
        self.store.put_item(record.into_item()).await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, RECORD_TYPE_ATTRIBUTE};
    use crate::visits::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_record_visit_counts_and_logs() {
        let table = MemoryStore::new("VisitorCounter");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let counter = VisitCounter::with_clock(Arc::new(table.clone()), Arc::new(FixedClock(at)));

        let visitor = Visitor {
            ip: "1.2.3.4".into(),
            user_agent: "test-agent".into(),
        };
        assert_eq!(counter.record_visit(&visitor).await.unwrap(), 1);

        let counter_item = table.get(COUNTER_KEY).unwrap();
        assert_eq!(counter_item.get_number(COUNT_ATTRIBUTE), Some(1));
        assert_eq!(counter_item.get_str(RECORD_TYPE_ATTRIBUTE), Some(COUNTER_RECORD_TYPE));

        let log = table.get("ip:1.2.3.4@2024-01-01T00:00:00.000000").unwrap();
        assert_eq!(log.get_str("ip"), Some("1.2.3.4"));
        assert_eq!(log.get_str("timestamp"), Some("2024-01-01T00:00:00.000000"));
        assert_eq!(log.get_str("user_agent"), Some("test-agent"));
    }
}
