use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::application::ports::conflict_notifier::ConflictNotifier;
use crate::application::ports::record_cache::RecordCache;
use crate::application::ports::record_store::{ConditionalWrite, RecordStore};
use crate::domain::entities::{ConflictInfo, RecordRow};
use crate::domain::value_objects::{CacheKey, MutationId, RecordId, TableBinding, UpdatePatch, Version};
use crate::shared::error::OccError;

mod snapshot;

use snapshot::CacheSnapshot;

/// Replacement for the default optimistic merge, e.g. to recompute derived
/// fields. A custom transform is itself responsible for bumping the version.
pub type ApplyTransform = Arc<dyn Fn(&RecordRow) -> RecordRow + Send + Sync>;

pub type SuccessHook = Box<dyn Fn(&RecordRow) + Send + Sync>;
pub type ConflictHook = Box<dyn Fn(&ConflictInfo) + Send + Sync>;
pub type ErrorHook = Box<dyn Fn(&OccError) + Send + Sync>;

/// One mutation intent: which record, which fields, and the version the
/// caller last saw. Consumed by a single `update` call; never retried
/// automatically.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub id: RecordId,
    pub patch: UpdatePatch,
    pub expected_version: Version,
}

impl UpdateRequest {
    pub fn new(id: RecordId, patch: UpdatePatch, expected_version: Version) -> Self {
        Self {
            id,
            patch,
            expected_version,
        }
    }
}

/// Optional per-call callbacks and overrides.
#[derive(Default)]
pub struct UpdateHooks {
    pub on_success: Option<SuccessHook>,
    pub on_conflict: Option<ConflictHook>,
    pub on_error: Option<ErrorHook>,
    pub transform: Option<ApplyTransform>,
    /// Skips the engine-level notifier for this call. The conflict is still
    /// stored and returned in the error.
    pub suppress_notification: bool,
}

/// Outcome of the store round trips, before cache bookkeeping.
enum WriteFailure {
    Conflict {
        actual_version: Version,
        server_data: RecordRow,
    },
    Other(OccError),
}

/// Orchestrates the optimistic update lifecycle for one table binding:
/// snapshot the owned cache keys, apply the predicted value, run the
/// conditional write against the store, then either invalidate (commit) or
/// restore the snapshot and surface the conflict.
///
/// Concurrent `update` calls for the same record race independently; the
/// store's conditional write is the single arbiter, so at most one racer
/// with a given expected version can commit.
pub struct OptimisticUpdateService {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn RecordCache>,
    notifier: Arc<dyn ConflictNotifier>,
    binding: TableBinding,
    cache_keys: RwLock<Vec<CacheKey>>,
    conflict: RwLock<Option<ConflictInfo>>,
    in_flight: AtomicU32,
    // Serializes snapshot+apply (and restore) so two mutations' windows
    // never interleave on the same cache entries.
    apply_guard: Mutex<()>,
}

impl OptimisticUpdateService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn RecordCache>,
        notifier: Arc<dyn ConflictNotifier>,
        binding: TableBinding,
    ) -> Self {
        Self {
            store,
            cache,
            notifier,
            binding,
            cache_keys: RwLock::new(Vec::new()),
            conflict: RwLock::new(None),
            in_flight: AtomicU32::new(0),
            apply_guard: Mutex::new(()),
        }
    }

    pub fn binding(&self) -> &TableBinding {
        &self.binding
    }

    /// Registers a cache entry as owned by this engine: snapshotted,
    /// optimistically rewritten and invalidated on every update.
    pub async fn register_cache_key(&self, key: CacheKey) {
        let mut keys = self.cache_keys.write().await;
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    pub async fn cache_keys(&self) -> Vec<CacheKey> {
        self.cache_keys.read().await.clone()
    }

    /// Whether any update is currently in flight. Racing calls each count;
    /// the flag drops only when the last one finishes. Advisory only;
    /// callers should disable the triggering control while this is true.
    pub fn is_updating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn current_conflict(&self) -> Option<ConflictInfo> {
        self.conflict.read().await.clone()
    }

    pub async fn clear_conflict(&self) {
        *self.conflict.write().await = None;
    }

    /// The "reload to latest" action: invalidates every owned cache key and
    /// clears the stored conflict.
    pub async fn refresh(&self) {
        let keys = self.cache_keys().await;
        for key in &keys {
            self.cache.invalidate(key).await;
        }
        self.clear_conflict().await;
    }

    pub async fn update(&self, request: UpdateRequest) -> Result<RecordRow, OccError> {
        self.update_with_hooks(request, UpdateHooks::default()).await
    }

    pub async fn update_with_hooks(
        &self,
        request: UpdateRequest,
        hooks: UpdateHooks,
    ) -> Result<RecordRow, OccError> {
        // Rejected before any snapshot or network call; the cache stays
        // untouched.
        if request.patch.contains_field(self.binding.version_column()) {
            return Err(OccError::Precondition(format!(
                "patch must not set the version column '{}'",
                self.binding.version_column()
            )));
        }

        let mutation_id = MutationId::new();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = self.run(mutation_id, &request, &hooks).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn run(
        &self,
        mutation_id: MutationId,
        request: &UpdateRequest,
        hooks: &UpdateHooks,
    ) -> Result<RecordRow, OccError> {
        let keys = self.cache_keys().await;

        for key in &keys {
            self.cache.cancel_inflight(key).await;
        }

        let snapshot = {
            let _guard = self.apply_guard.lock().await;
            let snapshot = CacheSnapshot::capture(self.cache.as_ref(), &keys).await;
            self.apply_optimistic(&keys, request, hooks.transform.clone())
                .await;
            snapshot
        };

        debug!(
            mutation = %mutation_id,
            record = %request.id,
            expected = %request.expected_version,
            "optimistic update started"
        );

        match self.write(request).await {
            Ok(row) => {
                for key in &keys {
                    self.cache.invalidate(key).await;
                }
                self.clear_conflict().await;
                if let Some(on_success) = &hooks.on_success {
                    on_success(&row);
                }
                debug!(mutation = %mutation_id, record = %request.id, "optimistic update committed");
                Ok(row)
            }
            Err(WriteFailure::Conflict {
                actual_version,
                server_data,
            }) => {
                self.rollback(&snapshot).await;
                let conflict = ConflictInfo::new(
                    mutation_id,
                    request.id.clone(),
                    request.expected_version,
                    actual_version,
                    server_data,
                    request.patch.clone(),
                );
                warn!(
                    mutation = %mutation_id,
                    record = %request.id,
                    expected = %conflict.expected_version,
                    actual = %conflict.actual_version,
                    "version conflict detected, cache rolled back"
                );
                *self.conflict.write().await = Some(conflict.clone());
                if !hooks.suppress_notification {
                    self.notifier.notify(&conflict).await;
                }
                if let Some(on_conflict) = &hooks.on_conflict {
                    on_conflict(&conflict);
                }
                Err(OccError::VersionConflict(Box::new(conflict)))
            }
            Err(WriteFailure::Other(err)) => {
                self.rollback(&snapshot).await;
                warn!(
                    mutation = %mutation_id,
                    record = %request.id,
                    error = %err,
                    "update failed, cache rolled back"
                );
                if let Some(on_error) = &hooks.on_error {
                    on_error(&err);
                }
                Err(err)
            }
        }
    }

    async fn apply_optimistic(
        &self,
        keys: &[CacheKey],
        request: &UpdateRequest,
        transform: Option<ApplyTransform>,
    ) {
        let transform = transform.unwrap_or_else(|| {
            let patch = request.patch.clone();
            let version_column = self.binding.version_column().to_string();
            Arc::new(move |row: &RecordRow| row.apply_patch(&patch, &version_column))
        });

        for key in keys {
            if let Some(value) = self.cache.get(key).await {
                let next = value.apply(self.binding.id_column(), &request.id, |row| transform(row));
                self.cache.set(key, next).await;
            }
        }
    }

    async fn rollback(&self, snapshot: &CacheSnapshot) {
        let _guard = self.apply_guard.lock().await;
        snapshot.restore(self.cache.as_ref()).await;
    }

    /// Steps 4 and 5 of the protocol: authoritative read-check, then the
    /// conditional write. The race between the two round trips is inherent
    /// to the design; the conditional write is the sole source of truth and
    /// the read-check only a fail-fast.
    async fn write(&self, request: &UpdateRequest) -> Result<RecordRow, WriteFailure> {
        let current = self
            .store
            .fetch_one(&self.binding, &request.id)
            .await
            .map_err(WriteFailure::Other)?;

        let Some(current) = current else {
            return Err(WriteFailure::Other(OccError::NotFound(format!(
                "{} '{}'",
                self.binding.table(),
                request.id
            ))));
        };

        let Some(actual) = current.version(self.binding.version_column()) else {
            // The record carries no version column: nothing to compare
            // against, so the write proceeds unconditionally.
            return self
                .store
                .update_unchecked(&self.binding, &request.id, &request.patch)
                .await
                .map_err(WriteFailure::Other);
        };

        if actual != request.expected_version {
            return Err(WriteFailure::Conflict {
                actual_version: actual,
                server_data: current,
            });
        }

        match self
            .store
            .conditional_update(
                &self.binding,
                &request.id,
                request.expected_version,
                &request.patch,
            )
            .await
        {
            Ok(ConditionalWrite::Updated(row)) => Ok(row),
            Ok(ConditionalWrite::NoMatchingRow) => {
                // The version changed between the read-check and the write.
                // Re-fetch so the conflict carries the fresher state.
                let fresher = self
                    .store
                    .fetch_one(&self.binding, &request.id)
                    .await
                    .map_err(WriteFailure::Other)?;
                match fresher {
                    Some(row) => match row.version(self.binding.version_column()) {
                        Some(actual_version) => Err(WriteFailure::Conflict {
                            actual_version,
                            server_data: row,
                        }),
                        None => Err(WriteFailure::Other(OccError::Store(format!(
                            "conditional update on {} '{}' matched no row, but the record has no version column",
                            self.binding.table(),
                            request.id
                        )))),
                    },
                    None => Err(WriteFailure::Other(OccError::NotFound(format!(
                        "{} '{}'",
                        self.binding.table(),
                        request.id
                    )))),
                }
            }
            Err(err) => Err(WriteFailure::Other(err)),
        }
    }
}
