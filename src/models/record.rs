//! Normalized traffic record
//!
//! An `InterfaceRecord` is built fresh from every report the collector reads.
//! Nothing mutates it afterwards; callers either serialize it or read the
//! monthly totals out of it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Calendar date as reported by vnstat
/// Monthly entries carry no day, so `day` is optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateStamp {
    pub year: i32,
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

/// Wall-clock time of day (minute resolution)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStamp {
    pub hour: u32,
    pub minute: u32,
}

/// Date with optional time, used for creation/update stamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub date: DateStamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeStamp>,
}

impl Stamp {
    /// Converts the stamp into a chrono value, filling a missing day with the
    /// first of the month and a missing time with midnight
    ///
    /// Returns `None` when the fields do not form a valid calendar date.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.date.year, self.date.month, self.date.day.unwrap_or(1))?;
        let (hour, minute) = self.time.map(|t| (t.hour, t.minute)).unwrap_or((0, 0));
        date.and_hms_opt(hour, minute, 0)
    }
}

/// Sent/received byte pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transfer {
    /// Bytes received
    pub rx: u64,
    /// Bytes sent
    pub tx: u64,
}

impl Transfer {
    /// Total bytes moved in both directions
    pub fn total(&self) -> u64 {
        self.rx.saturating_add(self.tx)
    }
}

/// One dated entry of a day/month/hour/top sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub date: DateStamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeStamp>,
    pub rx: u64,
    pub tx: u64,
}

impl TransferRecord {
    pub fn stamp(&self) -> Stamp {
        Stamp {
            date: self.date,
            time: self.time,
        }
    }

    pub fn transfer(&self) -> Transfer {
        Transfer {
            rx: self.rx,
            tx: self.tx,
        }
    }

    /// Total bytes sent and received during this period
    pub fn total(&self) -> u64 {
        self.transfer().total()
    }
}

/// Per-period traffic breakdown for one interface
///
/// `days`, `months` and `hours` are ordered most-recent-first. `tops` keeps
/// the ranking vnstat produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub total: Transfer,
    #[serde(default)]
    pub days: Vec<TransferRecord>,
    #[serde(default)]
    pub months: Vec<TransferRecord>,
    #[serde(default)]
    pub hours: Vec<TransferRecord>,
    #[serde(default)]
    pub tops: Vec<TransferRecord>,
}

impl TrafficSummary {
    /// The most recent month, if vnstat has any monthly data
    pub fn current_month(&self) -> Option<&TransferRecord> {
        self.months.first()
    }

    /// Bytes sent plus received in the most recent month, 0 without data
    pub fn cumulative_monthly_transfer(&self) -> u64 {
        self.current_month().map(TransferRecord::total).unwrap_or(0)
    }
}

/// Traffic report for a single interface
///
/// Serialized as-is by `/vnstat/{iface}/{debug}`: field names are the ones
/// below and byte counts are JSON numbers, not numeric strings, so clients
/// expecting string counts or vnstat's own field names will not read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    /// Interface name as known to vnstat (e.g. "eth0")
    pub id: String,
    /// User-assigned alias, empty when none is set
    pub nick: String,
    pub created: Stamp,
    pub updated: Stamp,
    pub traffic: TrafficSummary,
}
