pub mod cache_entry;
pub mod conflict;
pub mod record;

pub use cache_entry::CachedValue;
pub use conflict::ConflictInfo;
pub use record::RecordRow;
