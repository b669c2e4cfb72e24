pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::ports::{ConditionalWrite, ConflictNotifier, RecordCache, RecordStore};
pub use application::services::{
    ApplyTransform, OptimisticUpdateService, UpdateHooks, UpdateRequest,
};
pub use domain::entities::{CachedValue, ConflictInfo, RecordRow};
pub use domain::value_objects::{
    CacheKey, MutationId, RecordId, TableBinding, UpdatePatch, Version,
};
pub use shared::error::OccError;

/// Install the default tracing subscriber. Call once at startup; embedders
/// with their own subscriber should skip this.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verrow=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
