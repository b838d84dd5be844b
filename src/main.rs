use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use zonewatch::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr; stdout carries the record stream.
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    let whitelist = app_config.app_whitelist();
    let dial_timeout = Duration::from_secs(app_config.client.dial_timeout_secs);

    let (senders, metrics_rx, events_rx) = collector::channels();

    for zone_config in &app_config.zones {
        let zone = Arc::new(
            zone::Zone::connect(zone_config, whitelist.clone(), dial_timeout).await?,
        );
        tracing::info!(zone = %zone.name, api = %zone_config.api, "zone authenticated");
        worker::spawn_spaces_loop(zone.clone(), app_config.polling.spaces_interval_secs);
        worker::spawn_apps_loop(zone, app_config.polling.apps_interval_secs, senders.clone());
    }

    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        zones = app_config.zones.len(),
        "collector started"
    );

    // The loops hold the remaining sender clones; the serializer below runs
    // until the process is killed, or returns an error on a broken output
    // stream, which halts the process.
    drop(senders);

    collector::run(metrics_rx, events_rx, tokio::io::stdout()).await
}
