pub mod conflict_notifier;
pub mod record_cache;
pub mod record_store;

pub use conflict_notifier::ConflictNotifier;
pub use record_cache::RecordCache;
pub use record_store::{ConditionalWrite, RecordStore};
