//! Redaction-map retention — maps held for later restore, with a TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use veil_core::RetentionConfig;
use veil_redact::RedactionMap;

use crate::state::AppState;

struct StoredMap {
    map: RedactionMap,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Handle returned to the caller when a map is retained.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetainedMap {
    pub map_id: String,
    pub expires_at: String,
}

/// In-memory map store with a fixed retention window and bounded capacity.
pub struct MapStore {
    maps: RwLock<HashMap<String, StoredMap>>,
    retention: chrono::Duration,
    max_maps: usize,
}

impl MapStore {
    pub fn new(config: &RetentionConfig) -> Self {
        Self {
            maps: RwLock::new(HashMap::new()),
            retention: chrono::Duration::hours(config.retention_hours as i64),
            max_maps: config.max_stored_maps,
        }
    }

    /// Keep `map` until the retention window elapses.
    pub fn insert(&self, map: RedactionMap) -> RetainedMap {
        self.insert_at(map, Utc::now())
    }

    fn insert_at(&self, map: RedactionMap, now: DateTime<Utc>) -> RetainedMap {
        let id = uuid::Uuid::new_v4().to_string();
        let expires_at = now + self.retention;

        let mut maps = self.maps.write();
        while maps.len() >= self.max_maps {
            let Some(oldest_id) = maps
                .iter()
                .min_by_key(|(_, stored)| stored.created_at)
                .map(|(id, _)| id.clone())
            else {
                break;
            };
            maps.remove(&oldest_id);
            debug!("Evicted redaction map {}", oldest_id);
        }
        maps.insert(
            id.clone(),
            StoredMap {
                map,
                created_at: now,
                expires_at,
            },
        );

        RetainedMap {
            map_id: id,
            expires_at: expires_at.to_rfc3339(),
        }
    }

    /// A live map by id. Expired maps are dropped on access.
    pub fn get(&self, id: &str) -> Option<RedactionMap> {
        self.get_at(id, Utc::now())
    }

    fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<RedactionMap> {
        {
            let maps = self.maps.read();
            match maps.get(id) {
                Some(stored) if stored.expires_at > now => return Some(stored.map.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.maps.write().remove(id);
        None
    }

    pub fn remove(&self, id: &str) -> bool {
        self.maps.write().remove(id).is_some()
    }

    /// Drop every expired map; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut maps = self.maps.write();
        let before = maps.len();
        maps.retain(|_, stored| stored.expires_at > now);
        before - maps.len()
    }

    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.read().is_empty()
    }
}

/// Start the background purge task.
pub fn start_sweeper(state: Arc<AppState>) {
    let every = Duration::from_secs(state.config.retention.sweep_interval_secs);
    tokio::spawn(async move {
        info!("Redaction map sweeper started ({}s interval)", every.as_secs());
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = state.maps.purge_expired();
            if purged > 0 {
                info!("Purged {} expired redaction maps", purged);
            }
        }
    });
}
