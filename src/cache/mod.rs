//! Request cache for the addressable image endpoint
//!
//! Maps a caller-chosen key to the [`GenerationPayload`] it was written
//! with. Entries are readable for [`REQUEST_TTL`] after their last write.
//! Expiry is checked on read, so an expired entry looks exactly like a key
//! that was never written. Image bytes are never stored, only the
//! parameters needed to render them again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::models::GenerationPayload;

/// How long a stored payload stays readable
pub const REQUEST_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: GenerationPayload,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) <= REQUEST_TTL
    }
}

/// Process-wide payload store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct RequestCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `payload` under `key`, replacing whatever was there.
    pub async fn put(&self, key: &str, payload: GenerationPayload) {
        let entry = CacheEntry {
            payload,
            stored_at: Instant::now(),
        };
        let replaced = self
            .entries
            .write()
            .await
            .insert(key.to_string(), entry)
            .is_some();
        debug!("Stored request payload under key {} (replaced: {})", key, replaced);
    }

    /// Payload stored under `key`, if it was written within the TTL.
    pub async fn get(&self, key: &str) -> Option<GenerationPayload> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => {
                debug!("Request cache hit for key {}", key);
                Some(entry.payload.clone())
            }
            _ => {
                debug!("Request cache miss for key {}", key);
                None
            }
        }
    }

    /// Drop expired entries; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Periodically purge expired entries. Runs until the task is dropped.
    pub async fn run_sweeper(self, interval: Duration) {
        info!(
            "Request cache sweeper running every {}",
            humantime::format_duration(interval)
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = self.purge_expired().await;
            if removed > 0 {
                debug!("Request cache sweep removed {} expired entries", removed);
            }
        }
    }
}
