use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::record_cache::RecordCache;
use crate::domain::entities::CachedValue;
use crate::domain::value_objects::CacheKey;

struct CacheSlot {
    value: CachedValue,
    stale: bool,
}

/// In-memory record cache. Stale entries keep serving their last value
/// until the owner refetches and overwrites them; `cancel_inflight` only
/// records the quiesce request so owners (and tests) can observe it.
#[derive(Default)]
pub struct InMemoryRecordCache {
    entries: RwLock<HashMap<CacheKey, CacheSlot>>,
    quiesced: RwLock<HashMap<CacheKey, u32>>,
}

impl InMemoryRecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_stale(&self, key: &CacheKey) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|slot| slot.stale)
    }

    /// How many times background refreshes were quiesced for the key.
    pub async fn inflight_cancellations(&self, key: &CacheKey) -> u32 {
        self.quiesced.read().await.get(key).copied().unwrap_or(0)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RecordCache for InMemoryRecordCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        self.entries
            .read()
            .await
            .get(key)
            .map(|slot| slot.value.clone())
    }

    async fn set(&self, key: &CacheKey, value: CachedValue) {
        self.entries
            .write()
            .await
            .insert(key.clone(), CacheSlot { value, stale: false });
    }

    async fn remove(&self, key: &CacheKey) {
        self.entries.write().await.remove(key);
    }

    async fn invalidate(&self, key: &CacheKey) {
        if let Some(slot) = self.entries.write().await.get_mut(key) {
            slot.stale = true;
        }
    }

    async fn cancel_inflight(&self, key: &CacheKey) {
        *self.quiesced.write().await.entry(key.clone()).or_insert(0) += 1;
    }
}
