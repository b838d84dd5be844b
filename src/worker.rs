// Per-zone polling loops and poll-cycle fan-out.
// Each zone runs two independent schedules: a spaces loop refreshing the name
// cache and an apps loop dispatching one poll cycle per tick.

use crate::api::ClientError;
use crate::collector::OutputSenders;
use crate::models::{AppState, Application, EventRecord, MetricRecord};
use crate::zone::Zone;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior, interval};

/// Refreshes the zone's space-name cache: once immediately, then every
/// `interval_secs`. A failed refresh leaves the cache stale until the next
/// firing.
pub fn spawn_spaces_loop(zone: Arc<Zone>, interval_secs: u64) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(interval_secs));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            match zone.spaces.refresh(zone.space_api.as_ref()).await {
                Ok(()) => {
                    let spaces = zone.spaces.len().await;
                    tracing::debug!(zone = %zone.name, spaces, "space names refreshed");
                }
                Err(e) => report_soft_failure(&zone.name, "list_spaces", &e),
            }
        }
    })
}

/// Runs one poll cycle per tick: once immediately, then every `interval_secs`.
/// `since` advances to "now" after each cycle is dispatched and bounds the
/// next cycle's event query. Fan-out tasks from a slow cycle keep their
/// original bound, so events at a tick boundary may repeat or drop under high
/// collaborator latency; they are not deduplicated.
pub fn spawn_apps_loop(
    zone: Arc<Zone>,
    interval_secs: u64,
    out: OutputSenders,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(interval_secs));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Events from before process start are not replayed.
        let mut since = Utc::now();
        loop {
            tick.tick().await;
            poll_cycle(&zone, Utc::now(), since, &out).await;
            since = Utc::now();
        }
    })
}

/// One tick's unit of work: list applications, filter by whitelist, spawn at
/// most one stats fetch and one events fetch per eligible application. The
/// spawned tasks are not awaited; one per application per tick, unbounded.
/// A listing failure degrades the whole cycle to a no-op for this tick.
pub async fn poll_cycle(
    zone: &Arc<Zone>,
    now: DateTime<Utc>,
    since: DateTime<Utc>,
    out: &OutputSenders,
) {
    let apps = match zone.apps.list_apps().await {
        Ok(apps) => apps,
        Err(e) => {
            report_soft_failure(&zone.name, "list_apps", &e);
            return;
        }
    };

    for app in apps {
        // The whitelist gates both stats and events.
        if !zone.includes_app(&app.name) {
            continue;
        }
        if app.state == AppState::Started {
            let zone = Arc::clone(zone);
            let tx = out.metrics.clone();
            let app = app.clone();
            tokio::spawn(async move {
                fetch_stats(zone, app, now, tx).await;
            });
        }
        let zone = Arc::clone(zone);
        let tx = out.events.clone();
        tokio::spawn(async move {
            fetch_events(zone, app, now, since, tx).await;
        });
    }
}

async fn fetch_stats(
    zone: Arc<Zone>,
    app: Application,
    now: DateTime<Utc>,
    tx: mpsc::UnboundedSender<MetricRecord>,
) {
    match zone.apps.app_stats(&app).await {
        Ok(raw) => {
            let space = zone.spaces.resolve(&app.space_guid).await;
            let record = MetricRecord::new(&zone.name, space, &app.name, now, raw);
            let _ = tx.send(record);
        }
        Err(e) => report_soft_failure(&zone.name, "app_stats", &e),
    }
}

async fn fetch_events(
    zone: Arc<Zone>,
    app: Application,
    now: DateTime<Utc>,
    since: DateTime<Utc>,
    tx: mpsc::UnboundedSender<EventRecord>,
) {
    match zone.events.app_events(&app, since).await {
        Ok(events) => {
            if events.is_empty() {
                return;
            }
            let space = zone.spaces.resolve(&app.space_guid).await;
            for event in events {
                let record = EventRecord::new(
                    &zone.name,
                    space.clone(),
                    &app.name,
                    now,
                    event.kind,
                    event.timestamp,
                );
                if tx.send(record).is_err() {
                    return;
                }
            }
        }
        Err(e) => report_soft_failure(&zone.name, "app_events", &e),
    }
}

/// Single funnel for transient collection failures: log and continue. The
/// affected record is not emitted; the next scheduled tick retries from
/// scratch with no carried-over state.
fn report_soft_failure(zone: &str, operation: &str, error: &ClientError) {
    tracing::warn!(zone, operation, error = %error, "transient collection failure");
}
