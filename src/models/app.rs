// Platform entities as seen by the collector (read-only)

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Application lifecycle state; the API reports upper-case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Started,
    Stopped,
    Unknown,
}

impl AppState {
    /// Parse from the API state string (e.g. "STARTED", "STOPPED").
    pub fn from_api(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "STARTED" => AppState::Started,
            "STOPPED" => AppState::Stopped,
            _ => AppState::Unknown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Application {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    pub state: AppState,
}

#[derive(Debug, Clone)]
pub struct Space {
    pub guid: String,
    pub name: String,
}

/// One lifecycle event for an application, with its actual occurrence time.
#[derive(Debug, Clone)]
pub struct AppEvent {
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-instance resource usage as reported by the stats endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInstanceStats {
    #[serde(default)]
    pub disk_quota: i64,
    #[serde(default)]
    pub mem_quota: i64,
    pub usage: RawUsage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUsage {
    #[serde(default)]
    pub cpu: f64,
    #[serde(default)]
    pub disk: i64,
    #[serde(default)]
    pub mem: i64,
}
