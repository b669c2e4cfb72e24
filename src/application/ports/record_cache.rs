use crate::domain::entities::CachedValue;
use crate::domain::value_objects::CacheKey;
use async_trait::async_trait;

/// Port to the key-addressed client cache the engine mutates optimistically.
#[async_trait]
pub trait RecordCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<CachedValue>;

    async fn set(&self, key: &CacheKey, value: CachedValue);

    async fn remove(&self, key: &CacheKey);

    /// Marks the entry stale so the next read triggers a refetch of the
    /// authoritative state.
    async fn invalidate(&self, key: &CacheKey);

    /// Quiesces background refreshes for the key while a mutation is in
    /// flight, so a concurrent refetch cannot clobber the optimistic value.
    async fn cancel_inflight(&self, key: &CacheKey);
}
