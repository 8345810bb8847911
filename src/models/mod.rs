//! Stats model
//!
//! `record` holds the normalized Interface Record handed to every caller,
//! `report` holds the raw document emitted by `vnstat --json` and the
//! translation from one to the other.

pub mod record;
pub mod report;

pub use record::{DateStamp, InterfaceRecord, Stamp, TimeStamp, TrafficSummary, Transfer, TransferRecord};
pub use report::{ReportError, parse_report};
