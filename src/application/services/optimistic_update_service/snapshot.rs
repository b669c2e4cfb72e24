use crate::application::ports::record_cache::RecordCache;
use crate::domain::entities::CachedValue;
use crate::domain::value_objects::CacheKey;

/// Pre-mutation state of every cache entry the engine owns. Captured before
/// the optimistic apply, immutable afterwards; replayed verbatim when a
/// write conflicts or fails so the cache never retains an unconfirmed value.
pub(super) struct CacheSnapshot {
    entries: Vec<(CacheKey, Option<CachedValue>)>,
}

impl CacheSnapshot {
    pub(super) async fn capture(cache: &dyn RecordCache, keys: &[CacheKey]) -> Self {
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            entries.push((key.clone(), cache.get(key).await));
        }
        Self { entries }
    }

    pub(super) async fn restore(&self, cache: &dyn RecordCache) {
        for (key, prior) in &self.entries {
            match prior {
                Some(value) => cache.set(key, value.clone()).await,
                None => cache.remove(key).await,
            }
        }
    }
}
