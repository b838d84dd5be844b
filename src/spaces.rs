// Per-zone space-name cache: read by every fetch task, replaced wholesale by
// the zone's spaces loop.

use crate::api::{ClientError, SpaceApi};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Mapping from space guid to display name. The mapping is only ever swapped
/// as a whole: `refresh` builds the replacement off-lock, so readers never
/// observe a partial listing and `resolve` blocks only for the swap itself.
#[derive(Default)]
pub struct SpaceNameCache {
    names: RwLock<HashMap<String, String>>,
}

impl SpaceNameCache {
    /// Returns the cached display name, or the guid unchanged when the space
    /// has not appeared in any successful refresh. Never touches the network.
    pub async fn resolve(&self, guid: &str) -> String {
        let names = self.names.read().await;
        match names.get(guid) {
            Some(name) => name.clone(),
            None => guid.to_string(),
        }
    }

    /// Lists all spaces and swaps in the complete new mapping. On any listing
    /// failure the previous mapping is left untouched and the error is
    /// returned to the caller.
    pub async fn refresh(&self, api: &dyn SpaceApi) -> Result<(), ClientError> {
        let spaces = api.list_spaces().await?;
        let fresh: HashMap<String, String> =
            spaces.into_iter().map(|s| (s.guid, s.name)).collect();

        *self.names.write().await = fresh;
        Ok(())
    }

    /// Number of cached names (for logging).
    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
