// Shared fake platform clients with invocation counters

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use zonewatch::api::{AppApi, ClientError, EventApi, SpaceApi};
use zonewatch::models::{AppEvent, AppState, Application, RawInstanceStats, RawUsage, Space};
use zonewatch::zone::Zone;

/// In-memory stand-in for one zone's API session. Failure flags switch
/// individual operations to a transient error; counters record every call.
#[derive(Default)]
pub struct FakePlatform {
    pub apps: Mutex<Vec<Application>>,
    pub spaces: Mutex<Vec<Space>>,
    /// Instance stats by app guid.
    pub stats: Mutex<HashMap<String, HashMap<String, RawInstanceStats>>>,
    /// Events by app guid.
    pub events: Mutex<HashMap<String, Vec<AppEvent>>>,

    pub fail_listing: AtomicBool,
    pub fail_spaces: AtomicBool,
    /// App guids whose stats fetch fails.
    pub fail_stats: Mutex<HashSet<String>>,

    pub list_app_calls: AtomicUsize,
    pub list_space_calls: AtomicUsize,
    /// App guid per stats fetch, in call order.
    pub stats_calls: Mutex<Vec<String>>,
    /// (app guid, since) per events fetch, in call order.
    pub event_calls: Mutex<Vec<(String, DateTime<Utc>)>>,
}

fn unavailable(path: &str) -> ClientError {
    ClientError::Status {
        status: 503,
        path: path.to_string(),
    }
}

#[async_trait]
impl AppApi for FakePlatform {
    async fn list_apps(&self) -> Result<Vec<Application>, ClientError> {
        self.list_app_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(unavailable("/v2/apps"));
        }
        Ok(self.apps.lock().unwrap().clone())
    }

    async fn app_stats(
        &self,
        app: &Application,
    ) -> Result<HashMap<String, RawInstanceStats>, ClientError> {
        self.stats_calls.lock().unwrap().push(app.guid.clone());
        if self.fail_stats.lock().unwrap().contains(&app.guid) {
            return Err(unavailable("/v2/apps/stats"));
        }
        Ok(self
            .stats
            .lock()
            .unwrap()
            .get(&app.guid)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl SpaceApi for FakePlatform {
    async fn list_spaces(&self) -> Result<Vec<Space>, ClientError> {
        self.list_space_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_spaces.load(Ordering::SeqCst) {
            return Err(unavailable("/v2/spaces"));
        }
        Ok(self.spaces.lock().unwrap().clone())
    }
}

#[async_trait]
impl EventApi for FakePlatform {
    async fn app_events(
        &self,
        app: &Application,
        since: DateTime<Utc>,
    ) -> Result<Vec<AppEvent>, ClientError> {
        self.event_calls
            .lock()
            .unwrap()
            .push((app.guid.clone(), since));
        Ok(self
            .events
            .lock()
            .unwrap()
            .get(&app.guid)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn app(guid: &str, name: &str, space_guid: &str, state: AppState) -> Application {
    Application {
        guid: guid.to_string(),
        name: name.to_string(),
        space_guid: space_guid.to_string(),
        state,
    }
}

pub fn instance(cpu: f64, disk: i64, disk_quota: i64, mem: i64, mem_quota: i64) -> RawInstanceStats {
    RawInstanceStats {
        disk_quota,
        mem_quota,
        usage: RawUsage { cpu, disk, mem },
    }
}

/// Builds a zone named "z1" wired to the fake for all three client roles.
pub fn zone_with(fake: Arc<FakePlatform>, whitelist: &[&str]) -> Arc<Zone> {
    let whitelist: HashSet<String> = whitelist.iter().map(|s| s.to_string()).collect();
    Arc::new(Zone::new(
        "z1",
        whitelist,
        fake.clone(),
        fake.clone(),
        fake,
    ))
}
