pub mod cache_key;
pub mod mutation_id;
pub mod patch;
pub mod record_id;
pub mod table_binding;
pub mod version;

pub use cache_key::CacheKey;
pub use mutation_id::MutationId;
pub use patch::UpdatePatch;
pub use record_id::RecordId;
pub use table_binding::TableBinding;
pub use version::Version;
