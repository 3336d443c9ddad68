//! Visit counting domain.
//!
//! # Data Flow
//! ```text
//! Visitor (ip, user agent)
//!     → counter.rs (add 1 to the counter record, then put a visit record)
//!     → model.rs  (record keys, attributes, record-type tags)
//! ```

pub mod clock;
pub mod counter;
pub mod model;

pub use clock::{Clock, FixedClock, SystemClock};
pub use counter::VisitCounter;
pub use model::{VisitLogEntry, VisitRecord, Visitor, COUNTER_KEY};
