// Authenticated HTTP client for one zone's platform API

use super::{AppApi, ClientError, EventApi, SpaceApi};
use crate::models::{AppEvent, AppState, Application, RawInstanceStats, Space};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// One authenticated session against a zone's API endpoint. Implements all
/// three collaborator traits; a zone shares one instance across them.
#[derive(Debug)]
pub struct HttpZoneApi {
    http: reqwest::Client,
    base: Url,
    token: String,
}

#[derive(Deserialize)]
struct InfoResponse {
    token_endpoint: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct Page<T> {
    next_url: Option<String>,
    resources: Vec<Resource<T>>,
}

#[derive(Deserialize)]
struct Resource<T> {
    metadata: Metadata,
    entity: T,
}

#[derive(Deserialize)]
struct Metadata {
    guid: String,
}

#[derive(Deserialize)]
struct AppEntity {
    name: String,
    space_guid: String,
    state: String,
}

#[derive(Deserialize)]
struct SpaceEntity {
    name: String,
}

#[derive(Deserialize)]
struct EventEntity {
    #[serde(rename = "type")]
    kind: String,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StatsEntry {
    stats: RawInstanceStats,
}

impl HttpZoneApi {
    /// Discovers the token endpoint, runs the password grant, and returns a
    /// session holding the bearer token. Any failure here is fatal to zone
    /// construction.
    pub async fn connect(
        api: &str,
        username: &str,
        password: &str,
        dial_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(api.trim_end_matches('/'))
            .map_err(|e| ClientError::Endpoint(format!("{api}: {e}")))?;
        let http = reqwest::Client::builder()
            .connect_timeout(dial_timeout)
            .build()?;

        let info_url = join(&base, "/v2/info")?;
        let resp = http.get(info_url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status(), &info_url));
        }
        let info: InfoResponse = resp.json().await?;

        let token_url = Url::parse(&format!("{}/oauth/token", info.token_endpoint))
            .map_err(|e| ClientError::Endpoint(format!("{}: {e}", info.token_endpoint)))?;
        let resp = http
            .post(token_url)
            .basic_auth("cf", Some(""))
            .form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ClientError::Auth {
                username: username.to_string(),
                status: resp.status().as_u16(),
            });
        }
        let token: TokenResponse = resp.json().await?;

        Ok(Self {
            http,
            base,
            token: token.access_token,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp.status(), &url));
        }
        Ok(resp.json().await?)
    }

    /// Follows `next_url` until the listing is exhausted.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        first: Url,
    ) -> Result<Vec<Resource<T>>, ClientError> {
        let mut resources = Vec::new();
        let mut next = Some(first);
        while let Some(url) = next {
            let page: Page<T> = self.get_json(url).await?;
            resources.extend(page.resources);
            next = page.next_url.map(|path| join(&self.base, &path)).transpose()?;
        }
        Ok(resources)
    }
}

fn join(base: &Url, path: &str) -> Result<Url, ClientError> {
    base.join(path)
        .map_err(|e| ClientError::Endpoint(format!("{path}: {e}")))
}

fn status_error(status: StatusCode, url: &Url) -> ClientError {
    ClientError::Status {
        status: status.as_u16(),
        path: url.path().to_string(),
    }
}

#[async_trait::async_trait]
impl AppApi for HttpZoneApi {
    async fn list_apps(&self) -> Result<Vec<Application>, ClientError> {
        let url = join(&self.base, "/v2/apps")?;
        let resources: Vec<Resource<AppEntity>> = self.get_paginated(url).await?;
        Ok(resources
            .into_iter()
            .map(|r| Application {
                guid: r.metadata.guid,
                name: r.entity.name,
                space_guid: r.entity.space_guid,
                state: AppState::from_api(&r.entity.state),
            })
            .collect())
    }

    async fn app_stats(
        &self,
        app: &Application,
    ) -> Result<HashMap<String, RawInstanceStats>, ClientError> {
        let url = join(&self.base, &format!("/v2/apps/{}/stats", app.guid))?;
        let entries: HashMap<String, StatsEntry> = self.get_json(url).await?;
        Ok(entries.into_iter().map(|(k, v)| (k, v.stats)).collect())
    }
}

#[async_trait::async_trait]
impl SpaceApi for HttpZoneApi {
    async fn list_spaces(&self) -> Result<Vec<Space>, ClientError> {
        let url = join(&self.base, "/v2/spaces")?;
        let resources: Vec<Resource<SpaceEntity>> = self.get_paginated(url).await?;
        Ok(resources
            .into_iter()
            .map(|r| Space {
                guid: r.metadata.guid,
                name: r.entity.name,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl EventApi for HttpZoneApi {
    async fn app_events(
        &self,
        app: &Application,
        since: DateTime<Utc>,
    ) -> Result<Vec<AppEvent>, ClientError> {
        let mut url = join(&self.base, "/v2/events")?;
        url.query_pairs_mut()
            .append_pair("q", &format!("actee:{}", app.guid))
            .append_pair(
                "q",
                &format!(
                    "timestamp>{}",
                    since.to_rfc3339_opts(SecondsFormat::Secs, true)
                ),
            );
        let resources: Vec<Resource<EventEntity>> = self.get_paginated(url).await?;
        Ok(resources
            .into_iter()
            .map(|r| AppEvent {
                kind: r.entity.kind,
                timestamp: r.entity.timestamp,
            })
            .collect())
    }
}
