// Record shape and usage-ratio derivation tests

use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use zonewatch::models::*;

fn raw(cpu: f64, disk: i64, disk_quota: i64, mem: i64, mem_quota: i64) -> RawInstanceStats {
    RawInstanceStats {
        disk_quota,
        mem_quota,
        usage: RawUsage { cpu, disk, mem },
    }
}

#[test]
fn test_calculate_usage_ratio() {
    assert_eq!(calculate_usage(100, 200), 0.5);
    assert_eq!(calculate_usage(50, 50), 1.0);
}

#[test]
fn test_calculate_usage_zero_sides_yield_zero() {
    // "No data yet" reads as 0%, not an error or NaN.
    assert_eq!(calculate_usage(0, 200), 0.0);
    assert_eq!(calculate_usage(100, 0), 0.0);
    assert_eq!(calculate_usage(0, 0), 0.0);
}

#[test]
fn test_metric_record_derives_usage_ratios() {
    let mut stats = HashMap::new();
    stats.insert("0".to_string(), raw(0.25, 100, 200, 0, 500));
    let ts = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();

    let record = MetricRecord::new("z1", "prod".into(), "web", ts, stats);
    let instance = &record.stats["0"];
    assert_eq!(instance.stats.usage.disk_usage, 0.5);
    assert_eq!(instance.stats.usage.mem_usage, 0.0);
    assert_eq!(instance.stats.usage.cpu, 0.25);
    assert_eq!(instance.stats.disk_quota, 200);
    assert_eq!(instance.stats.mem_quota, 500);
}

#[test]
fn test_metric_record_json_shape() {
    let mut stats = HashMap::new();
    stats.insert("0".to_string(), raw(0.1, 100, 200, 64, 128));
    let ts = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();

    let record = MetricRecord::new("z1", "prod".into(), "web", ts, stats);
    let json = serde_json::to_string(&record).unwrap();

    assert!(json.contains("\"zone\":\"z1\""));
    assert!(json.contains("\"space\":\"prod\""));
    assert!(json.contains("\"app\":\"web\""));
    assert!(json.contains("\"type\":\"metric\""));
    assert!(json.contains("\"diskQuota\":200"));
    assert!(json.contains("\"memQuota\":128"));
    assert!(json.contains("\"diskUsage\":0.5"));
    assert!(json.contains("\"memUsage\":0.5"));
    assert!(json.contains("2026-08-28T12:00:00Z"));
}

#[test]
fn test_event_record_json_shape() {
    let polled = Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap();
    let occurred = Utc.with_ymd_and_hms(2026, 8, 28, 11, 59, 30).unwrap();

    let record = EventRecord::new(
        "z1",
        "prod".into(),
        "web",
        polled,
        "audit.app.restage".into(),
        occurred,
    );
    let json = serde_json::to_string(&record).unwrap();

    assert!(json.contains("\"type\":\"event\""));
    assert!(json.contains("\"eventInfo\""));
    assert!(json.contains("\"audit.app.restage\""));
    // Outer timestamp is poll time, inner timestamp is occurrence time.
    assert!(json.contains("2026-08-28T12:00:00Z"));
    assert!(json.contains("2026-08-28T11:59:30Z"));
}

#[test]
fn test_app_state_parses_api_strings() {
    assert_eq!(AppState::from_api("STARTED"), AppState::Started);
    assert_eq!(AppState::from_api("started"), AppState::Started);
    assert_eq!(AppState::from_api("STOPPED"), AppState::Stopped);
    assert_eq!(AppState::from_api("weird"), AppState::Unknown);
}
