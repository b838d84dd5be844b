// Platform API seam: trait objects so workers can run against fakes in tests

mod http;

pub use http::HttpZoneApi;

use crate::models::{AppEvent, Application, RawInstanceStats, Space};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("authentication failed for {username}: status {status}")]
    Auth { username: String, status: u16 },
    #[error("unexpected status {status} from {path}")]
    Status { status: u16, path: String },
    #[error("invalid endpoint URL: {0}")]
    Endpoint(String),
}

/// Lists applications and fetches per-instance stats. Pagination is handled
/// inside the client; callers see the complete listing for the session.
#[async_trait::async_trait]
pub trait AppApi: Send + Sync {
    async fn list_apps(&self) -> Result<Vec<Application>, ClientError>;
    async fn app_stats(
        &self,
        app: &Application,
    ) -> Result<HashMap<String, RawInstanceStats>, ClientError>;
}

#[async_trait::async_trait]
pub trait SpaceApi: Send + Sync {
    async fn list_spaces(&self) -> Result<Vec<Space>, ClientError>;
}

/// Fetches lifecycle events for one application, server-side filtered to
/// `timestamp > since`.
#[async_trait::async_trait]
pub trait EventApi: Send + Sync {
    async fn app_events(
        &self,
        app: &Application,
        since: DateTime<Utc>,
    ) -> Result<Vec<AppEvent>, ClientError>;
}
