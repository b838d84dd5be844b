// One configured zone: identity, whitelist, authenticated clients, space cache

use crate::api::{AppApi, EventApi, HttpZoneApi, SpaceApi};
use crate::config::ZoneConfig;
use crate::spaces::SpaceNameCache;
use anyhow::Context;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Per-zone owned state. Constructed once at startup, lives until process
/// exit; the spaces loop is the only writer of `spaces`, every fetch task
/// reads it.
pub struct Zone {
    pub name: String,
    whitelist: HashSet<String>,
    pub apps: Arc<dyn AppApi>,
    pub space_api: Arc<dyn SpaceApi>,
    pub events: Arc<dyn EventApi>,
    pub spaces: SpaceNameCache,
}

impl Zone {
    /// Wires a zone from explicit collaborators (tests pass fakes here).
    pub fn new(
        name: impl Into<String>,
        whitelist: HashSet<String>,
        apps: Arc<dyn AppApi>,
        space_api: Arc<dyn SpaceApi>,
        events: Arc<dyn EventApi>,
    ) -> Self {
        Self {
            name: name.into(),
            whitelist,
            apps,
            space_api,
            events,
            spaces: SpaceNameCache::default(),
        }
    }

    /// Authenticates eagerly against the zone's endpoint and wires all three
    /// client roles to the one session. Failure here aborts startup: a single
    /// bad zone prevents the collector from running at all.
    pub async fn connect(
        config: &ZoneConfig,
        whitelist: HashSet<String>,
        dial_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let api = HttpZoneApi::connect(
            &config.api,
            &config.username,
            &config.password,
            dial_timeout,
        )
        .await
        .with_context(|| format!("zone {}: login to {} failed", config.name, config.api))?;
        let api = Arc::new(api);
        Ok(Self::new(
            config.name.clone(),
            whitelist,
            api.clone(),
            api.clone(),
            api,
        ))
    }

    /// Exact-match whitelist check; an empty whitelist admits everything.
    pub fn includes_app(&self, name: &str) -> bool {
        self.whitelist.is_empty() || self.whitelist.contains(name)
    }
}
