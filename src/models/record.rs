// Emitted record shapes: one JSON object per line on stdout

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::RawInstanceStats;

/// Record tag; serializes to lowercase JSON ("metric" / "event").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Metric,
    Event,
}

/// One snapshot of one application's instance-level usage at poll time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricRecord {
    pub zone: String,
    pub space: String,
    pub app: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub timestamp: DateTime<Utc>,
    pub stats: BTreeMap<String, InstanceSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstanceSnapshot {
    pub stats: ContainerStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStats {
    pub disk_quota: i64,
    pub mem_quota: i64,
    pub usage: Usage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub cpu: f64,
    pub disk: i64,
    pub mem: i64,
    pub disk_usage: f64,
    pub mem_usage: f64,
}

/// One lifecycle event; outer timestamp is poll time, eventInfo carries the
/// event's own type and occurrence time.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub zone: String,
    pub space: String,
    pub app: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "eventInfo")]
    pub event_info: EventInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

impl MetricRecord {
    pub fn new(
        zone: &str,
        space: String,
        app: &str,
        timestamp: DateTime<Utc>,
        raw: HashMap<String, RawInstanceStats>,
    ) -> Self {
        let stats = raw
            .into_iter()
            .map(|(index, s)| {
                let snapshot = InstanceSnapshot {
                    stats: ContainerStats {
                        disk_quota: s.disk_quota,
                        mem_quota: s.mem_quota,
                        usage: Usage {
                            cpu: s.usage.cpu,
                            disk: s.usage.disk,
                            mem: s.usage.mem,
                            disk_usage: calculate_usage(s.usage.disk, s.disk_quota),
                            mem_usage: calculate_usage(s.usage.mem, s.mem_quota),
                        },
                    },
                };
                (index, snapshot)
            })
            .collect();
        Self {
            zone: zone.to_string(),
            space,
            app: app.to_string(),
            record_type: RecordType::Metric,
            timestamp,
            stats,
        }
    }
}

impl EventRecord {
    pub fn new(
        zone: &str,
        space: String,
        app: &str,
        timestamp: DateTime<Utc>,
        kind: String,
        event_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            zone: zone.to_string(),
            space,
            app: app.to_string(),
            record_type: RecordType::Event,
            timestamp,
            event_info: EventInfo {
                kind,
                timestamp: event_timestamp,
            },
        }
    }
}

/// Usage ratio of `usage / quota`; 0.0 when either side is zero, so missing
/// data reads as 0% instead of an error or NaN.
pub fn calculate_usage(usage: i64, quota: i64) -> f64 {
    if usage == 0 || quota == 0 {
        return 0.0;
    }
    usage as f64 / quota as f64
}
