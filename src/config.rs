use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Comma-separated application names; empty or absent = poll everything.
    #[serde(default)]
    pub whitelist: String,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub client: ClientConfig,
    pub zones: Vec<ZoneConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    pub api: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_apps_interval_secs")]
    pub apps_interval_secs: u64,
    #[serde(default = "default_spaces_interval_secs")]
    pub spaces_interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            apps_interval_secs: default_apps_interval_secs(),
            spaces_interval_secs: default_spaces_interval_secs(),
        }
    }
}

fn default_apps_interval_secs() -> u64 {
    10
}

fn default_spaces_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_dial_timeout_secs")]
    pub dial_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dial_timeout_secs: default_dial_timeout_secs(),
        }
    }
}

fn default_dial_timeout_secs() -> u64 {
    5
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Process-wide application whitelist as an exact-match set.
    pub fn app_whitelist(&self) -> HashSet<String> {
        parse_whitelist(&self.whitelist)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.zones.is_empty(), "zones must contain at least one entry");
        for (i, zone) in self.zones.iter().enumerate() {
            anyhow::ensure!(!zone.name.is_empty(), "zones[{}].name must be non-empty", i);
            anyhow::ensure!(!zone.api.is_empty(), "zones[{}].api must be non-empty", i);
            anyhow::ensure!(
                !zone.username.is_empty(),
                "zones[{}].username must be non-empty",
                i
            );
            anyhow::ensure!(
                !zone.password.is_empty(),
                "zones[{}].password must be non-empty",
                i
            );
        }
        anyhow::ensure!(
            self.polling.apps_interval_secs > 0,
            "polling.apps_interval_secs must be > 0, got {}",
            self.polling.apps_interval_secs
        );
        anyhow::ensure!(
            self.polling.spaces_interval_secs > 0,
            "polling.spaces_interval_secs must be > 0, got {}",
            self.polling.spaces_interval_secs
        );
        anyhow::ensure!(
            self.client.dial_timeout_secs > 0,
            "client.dial_timeout_secs must be > 0, got {}",
            self.client.dial_timeout_secs
        );
        Ok(())
    }
}

/// Splits a comma-separated whitelist into an exact-match name set.
/// Empty segments are dropped; an empty input yields an empty (unrestricted) set.
pub fn parse_whitelist(whitelist: &str) -> HashSet<String> {
    whitelist
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
