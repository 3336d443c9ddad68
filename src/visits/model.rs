//! Counter and visit record shapes.

use chrono::{DateTime, Utc};

use crate::store::{Item, RECORD_TYPE_ATTRIBUTE};

/// Sentinel key of the singleton counter record.
pub const COUNTER_KEY: &str = "visitor_count";
/// Numeric attribute holding the all-time visit count.
pub const COUNT_ATTRIBUTE: &str = "count";

pub const COUNTER_RECORD_TYPE: &str = "counter";
pub const VISIT_RECORD_TYPE: &str = "visit";

/// Placeholder for missing header values and missing attributes.
pub const UNKNOWN: &str = "unknown";

/// Who made a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    pub ip: String,
    pub user_agent: String,
}

/// One immutable log entry per counted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRecord {
    pub ip: String,
    pub timestamp: String,
    pub user_agent: String,
}

impl VisitRecord {
    pub fn new(visitor: &Visitor, at: DateTime<Utc>) -> Self {
        Self {
            ip: visitor.ip.clone(),
            timestamp: format_timestamp(at),
            user_agent: visitor.user_agent.clone(),
        }
    }

    /// Table key: `ip:<ip>@<timestamp>`.
    pub fn key(&self) -> String {
        format!("ip:{}@{}", self.ip, self.timestamp)
    }

    pub fn into_item(self) -> Item {
        Item::new(self.key())
            .with(RECORD_TYPE_ATTRIBUTE, VISIT_RECORD_TYPE)
            .with("ip", self.ip)
            .with("timestamp", self.timestamp)
            .with("user_agent", self.user_agent)
    }
}

/// A visit record as read back from the table, where any attribute may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitLogEntry {
    pub id: String,
    pub ip: Option<String>,
    pub timestamp: Option<String>,
    pub user_agent: Option<String>,
}

impl VisitLogEntry {
    /// Interpret `item` as a visit log entry, or `None` if it is some other record.
    pub fn from_item(item: &Item) -> Option<Self> {
        if !is_visit_log(item) {
            return None;
        }
        Some(Self {
            id: item.id.clone(),
            ip: item.get_str("ip").map(str::to_string),
            timestamp: item.get_str("timestamp").map(str::to_string),
            user_agent: item.get_str("user_agent").map(str::to_string),
        })
    }

    /// Sort key; a missing timestamp sorts as the empty string.
    pub fn sort_key(&self) -> &str {
        self.timestamp.as_deref().unwrap_or("")
    }
}

/// Whether `item` is a visit log entry.
///
/// Items tagged with a record type are classified by the tag alone. Untagged
/// items fall back to the key convention: anything not under the counter's
/// sentinel key is a visit.
pub fn is_visit_log(item: &Item) -> bool {
    match item.get_str(RECORD_TYPE_ATTRIBUTE) {
        Some(kind) => kind == VISIT_RECORD_TYPE,
        None => !item.id.starts_with(COUNTER_KEY),
    }
}

/// ISO-8601 UTC with microseconds and no offset suffix, e.g. `2024-01-01T12:00:00.000000`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
