//! Raw vnstat report and its translation into an `InterfaceRecord`
//!
//! vnstat emits one JSON document per `--json` invocation. Only the fields
//! the record needs are modelled here; five-minute and yearly breakdowns are
//! ignored. Byte counts arrive as integers from vnstat 2.x but older tooling
//! wraps them in strings, so both shapes are accepted.
//!
//! vnstat 1.x documents (`"jsonversion": "1"`) count in KiB and carry the
//! hour of an hourly entry only in its `id`. Both are normalized here so a
//! record always holds bytes. A document without `jsonversion` is read with
//! the current layout.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use thiserror::Error;

use crate::models::record::{
    DateStamp, InterfaceRecord, Stamp, TimeStamp, TrafficSummary, Transfer, TransferRecord,
};

/// Reasons a vnstat document could not be turned into a record
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report is not valid vnstat JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("report has no entry for interface '{requested}' (found: {available:?})")]
    InterfaceMissing {
        requested: String,
        available: Vec<String>,
    },

    #[error("unsupported vnstat jsonversion {0}")]
    UnsupportedVersion(u64),
}

/// Layout generation of a vnstat JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Schema {
    /// vnstat 1.x: counts in KiB, hour in the entry `id`
    V1,
    /// vnstat 2.x: counts in bytes
    V2,
}

impl Schema {
    fn from_version(version: Option<u64>) -> Result<Self, ReportError> {
        match version {
            Some(1) => Ok(Schema::V1),
            Some(2) | None => Ok(Schema::V2),
            Some(other) => Err(ReportError::UnsupportedVersion(other)),
        }
    }

    /// Factor turning the document's counts into bytes
    fn unit(self) -> u64 {
        match self {
            Schema::V1 => 1024,
            Schema::V2 => 1,
        }
    }

    fn bytes(self, count: u64) -> u64 {
        count.saturating_mul(self.unit())
    }
}

#[derive(Debug, Deserialize)]
struct VnstatReport {
    #[serde(default, deserialize_with = "json_version")]
    jsonversion: Option<u64>,
    #[serde(default)]
    interfaces: Vec<ReportInterface>,
}

#[derive(Debug, Deserialize)]
struct ReportInterface {
    #[serde(alias = "id")]
    name: String,
    #[serde(default, alias = "nick")]
    alias: String,
    created: ReportStamp,
    updated: ReportStamp,
    traffic: ReportTraffic,
}

#[derive(Debug, Deserialize)]
struct ReportStamp {
    date: ReportDate,
    #[serde(default)]
    time: Option<ReportTime>,
}

#[derive(Debug, Deserialize)]
struct ReportDate {
    year: i32,
    month: u32,
    #[serde(default)]
    day: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ReportTime {
    hour: u32,
    minute: u32,
}

#[derive(Debug, Deserialize)]
struct ReportTotal {
    #[serde(deserialize_with = "byte_count")]
    rx: u64,
    #[serde(deserialize_with = "byte_count")]
    tx: u64,
}

#[derive(Debug, Deserialize)]
struct ReportEntry {
    #[serde(default)]
    id: Option<u64>,
    date: ReportDate,
    #[serde(default)]
    time: Option<ReportTime>,
    #[serde(deserialize_with = "byte_count")]
    rx: u64,
    #[serde(deserialize_with = "byte_count")]
    tx: u64,
}

#[derive(Debug, Deserialize)]
struct ReportTraffic {
    total: ReportTotal,
    #[serde(default, alias = "days")]
    day: Vec<ReportEntry>,
    #[serde(default, alias = "months")]
    month: Vec<ReportEntry>,
    #[serde(default, alias = "hours")]
    hour: Vec<ReportEntry>,
    #[serde(default, alias = "tops")]
    top: Vec<ReportEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

fn byte_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawCount::deserialize(deserializer)? {
        RawCount::Number(n) => Ok(n),
        RawCount::Text(text) => text
            .trim()
            .parse::<u64>()
            .map_err(|_| de::Error::custom(format!("expected an unsigned integer, got {text:?}"))),
    }
}

fn json_version<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    byte_count(deserializer).map(Some)
}

impl From<ReportDate> for DateStamp {
    fn from(date: ReportDate) -> Self {
        DateStamp {
            year: date.year,
            month: date.month,
            day: date.day,
        }
    }
}

impl From<ReportTime> for TimeStamp {
    fn from(time: ReportTime) -> Self {
        TimeStamp {
            hour: time.hour,
            minute: time.minute,
        }
    }
}

impl From<ReportStamp> for Stamp {
    fn from(stamp: ReportStamp) -> Self {
        Stamp {
            date: stamp.date.into(),
            time: stamp.time.map(Into::into),
        }
    }
}

impl ReportEntry {
    fn into_record(self, schema: Schema) -> TransferRecord {
        TransferRecord {
            date: self.date.into(),
            time: self.time.map(Into::into),
            rx: schema.bytes(self.rx),
            tx: schema.bytes(self.tx),
        }
    }

    /// Hourly entries of a V1 document only name their hour through `id`
    fn into_hour_record(self, schema: Schema) -> TransferRecord {
        let hour = match (schema, self.time.is_none(), self.id) {
            (Schema::V1, true, Some(id)) => u32::try_from(id).ok(),
            _ => None,
        };
        let mut record = self.into_record(schema);
        if let Some(hour) = hour {
            record.time = Some(TimeStamp { hour, minute: 0 });
        }
        record
    }
}

/// Orders records newest first
///
/// Entries whose stamp is not a valid calendar date sink to the end; ties
/// keep vnstat's order.
fn newest_first(mut records: Vec<TransferRecord>) -> Vec<TransferRecord> {
    records.sort_by(|a, b| {
        b.stamp()
            .to_naive_datetime()
            .cmp(&a.stamp().to_naive_datetime())
    });
    records
}

impl ReportInterface {
    fn into_record(self, schema: Schema) -> InterfaceRecord {
        let traffic = self.traffic;
        let convert = |entries: Vec<ReportEntry>| -> Vec<TransferRecord> {
            entries.into_iter().map(|e| e.into_record(schema)).collect()
        };

        InterfaceRecord {
            id: self.name,
            nick: self.alias,
            created: self.created.into(),
            updated: self.updated.into(),
            traffic: TrafficSummary {
                total: Transfer {
                    rx: schema.bytes(traffic.total.rx),
                    tx: schema.bytes(traffic.total.tx),
                },
                days: newest_first(convert(traffic.day)),
                months: newest_first(convert(traffic.month)),
                hours: newest_first(
                    traffic
                        .hour
                        .into_iter()
                        .map(|e| e.into_hour_record(schema))
                        .collect(),
                ),
                tops: convert(traffic.top),
            },
        }
    }
}

/// Parses a `vnstat --json` document and extracts the record for `interface`
///
/// When the document contains exactly one interface it is used even if its
/// name differs (vnstat reports aliases for some virtual links).
pub fn parse_report(raw: &str, interface: &str) -> Result<InterfaceRecord, ReportError> {
    let report: VnstatReport = serde_json::from_str(raw)?;
    let schema = Schema::from_version(report.jsonversion)?;
    let mut interfaces = report.interfaces;

    if let Some(index) = interfaces.iter().position(|i| i.name == interface) {
        return Ok(interfaces.swap_remove(index).into_record(schema));
    }

    if interfaces.len() == 1 {
        if let Some(only) = interfaces.pop() {
            return Ok(only.into_record(schema));
        }
    }

    Err(ReportError::InterfaceMissing {
        requested: interface.to_string(),
        available: interfaces.into_iter().map(|i| i.name).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../tests/fixtures/vnstat_eth0.json");
    const SAMPLE_V1: &str = include_str!("../../tests/fixtures/vnstat1_eth0.json");

    fn month_entry(year: i32, month: u32, rx: u64) -> TransferRecord {
        TransferRecord {
            date: DateStamp {
                year,
                month,
                day: None,
            },
            time: None,
            rx,
            tx: 0,
        }
    }

    #[test]
    fn test_parse_sample_report() {
        let record = parse_report(SAMPLE, "eth0").unwrap();

        assert_eq!(record.id, "eth0");
        assert_eq!(record.nick, "uplink");
        assert_eq!(record.created.date.year, 2023);
        assert_eq!(record.updated.time, Some(TimeStamp { hour: 14, minute: 35 }));
        assert_eq!(record.traffic.total.rx, 987_654_321_000);
        assert_eq!(record.traffic.total.tx, 123_456_789_000);
        assert_eq!(record.traffic.days.len(), 3);
        assert_eq!(record.traffic.months.len(), 2);
        assert_eq!(record.traffic.hours.len(), 2);
        assert_eq!(record.traffic.tops.len(), 2);
    }

    #[test]
    fn test_sequences_are_ordered_newest_first() {
        let record = parse_report(SAMPLE, "eth0").unwrap();

        let current = record.traffic.current_month().unwrap();
        assert_eq!((current.date.year, current.date.month), (2024, 5));

        let days: Vec<_> = record.traffic.days.iter().map(|d| d.date.day).collect();
        assert_eq!(days, vec![Some(16), Some(15), Some(14)]);

        let hours: Vec<_> = record
            .traffic
            .hours
            .iter()
            .map(|h| h.time.map(|t| t.hour))
            .collect();
        assert_eq!(hours, vec![Some(14), Some(13)]);
    }

    #[test]
    fn test_tops_keep_vnstat_order() {
        let record = parse_report(SAMPLE, "eth0").unwrap();
        let first = record.traffic.tops[0];
        assert_eq!(first.date.day, Some(2));
    }

    #[test]
    fn test_string_byte_counts_are_accepted() {
        let raw = r#"{"interfaces":[{"id":"wlan0","nick":"","created":{"date":{"year":2020,"month":1,"day":1}},
            "updated":{"date":{"year":2020,"month":2,"day":1},"time":{"hour":1,"minute":2}},
            "traffic":{"total":{"rx":"10","tx":" 20 "},"months":[{"date":{"year":2020,"month":2},"rx":"3","tx":"4"}]}}]}"#;

        let record = parse_report(raw, "wlan0").unwrap();
        assert_eq!(record.traffic.total, Transfer { rx: 10, tx: 20 });
        assert_eq!(record.traffic.cumulative_monthly_transfer(), 7);
        assert!(record.traffic.days.is_empty());
    }

    #[test]
    fn test_negative_byte_count_is_rejected() {
        let raw = r#"{"interfaces":[{"name":"eth0","alias":"","created":{"date":{"year":2020,"month":1,"day":1}},
            "updated":{"date":{"year":2020,"month":1,"day":1}},
            "traffic":{"total":{"rx":-1,"tx":0}}}]}"#;

        assert!(matches!(parse_report(raw, "eth0"), Err(ReportError::Syntax(_))));
    }

    #[test]
    fn test_garbage_is_syntax_error() {
        assert!(matches!(
            parse_report("Error: Unable to open database", "eth0"),
            Err(ReportError::Syntax(_))
        ));
    }

    #[test]
    fn test_missing_interface_lists_available() {
        let raw = r#"{"interfaces":[
            {"name":"eth0","alias":"","created":{"date":{"year":2020,"month":1,"day":1}},"updated":{"date":{"year":2020,"month":1,"day":1}},"traffic":{"total":{"rx":0,"tx":0}}},
            {"name":"eth1","alias":"","created":{"date":{"year":2020,"month":1,"day":1}},"updated":{"date":{"year":2020,"month":1,"day":1}},"traffic":{"total":{"rx":0,"tx":0}}}
        ]}"#;

        match parse_report(raw, "wg0") {
            Err(ReportError::InterfaceMissing {
                requested,
                available,
            }) => {
                assert_eq!(requested, "wg0");
                assert_eq!(available, vec!["eth0".to_string(), "eth1".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_single_interface_used_regardless_of_name() {
        let record = parse_report(SAMPLE, "renamed0").unwrap();
        assert_eq!(record.id, "eth0");
    }

    #[test]
    fn test_v1_counts_are_scaled_from_kib() {
        let record = parse_report(SAMPLE_V1, "eth0").unwrap();

        // 1 GiB expressed in KiB
        assert_eq!(record.traffic.cumulative_monthly_transfer(), crate::formatting::GIB);
        assert_eq!(
            record.traffic.total,
            Transfer {
                rx: 50 * crate::formatting::GIB,
                tx: 10 * crate::formatting::GIB,
            }
        );
        assert_eq!(record.traffic.days[0].total(), 3 * 1024 * 1024);
        assert_eq!(record.traffic.tops[0].rx, 8 * crate::formatting::GIB);
    }

    #[test]
    fn test_v1_hours_take_their_hour_from_id() {
        let record = parse_report(SAMPLE_V1, "eth0").unwrap();

        let hours: Vec<_> = record
            .traffic
            .hours
            .iter()
            .map(|h| (h.date.day, h.time.map(|t| t.hour)))
            .collect();
        assert_eq!(
            hours,
            vec![(Some(16), Some(2)), (Some(16), Some(1)), (Some(16), Some(0)), (Some(15), Some(23))]
        );
        assert_eq!(record.traffic.hours[0].rx, 300 * 1024);
    }

    #[test]
    fn test_v2_entry_ids_are_not_hours() {
        let record = parse_report(SAMPLE, "eth0").unwrap();
        assert!(record.traffic.days.iter().all(|d| d.time.is_none()));
        assert_eq!(record.traffic.total.rx, 987_654_321_000);
    }

    #[test]
    fn test_unknown_json_version_is_rejected() {
        let raw = r#"{"jsonversion":"3","interfaces":[]}"#;
        assert!(matches!(
            parse_report(raw, "eth0"),
            Err(ReportError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn test_newest_first_sinks_invalid_stamps_and_keeps_ties() {
        let records = vec![
            month_entry(2024, 4, 1),
            month_entry(2024, 13, 2),
            month_entry(2024, 5, 3),
            month_entry(2024, 4, 4),
        ];

        let ordered: Vec<_> = newest_first(records).iter().map(|r| r.rx).collect();
        assert_eq!(ordered, vec![3, 1, 4, 2]);
    }
}
