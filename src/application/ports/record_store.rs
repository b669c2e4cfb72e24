use crate::domain::entities::RecordRow;
use crate::domain::value_objects::{RecordId, TableBinding, UpdatePatch, Version};
use crate::shared::error::OccError;
use async_trait::async_trait;

/// Outcome of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalWrite {
    /// The stored version matched and the row was updated; carries the row
    /// as the store committed it.
    Updated(RecordRow),
    /// No row with the expected version existed at write time.
    NoMatchingRow,
}

/// Port to the authoritative row store. The store must increment the version
/// column atomically as part of any successful write to a versioned row,
/// including writes that bypass this engine, so externally-made edits are
/// detected as well.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_one(
        &self,
        binding: &TableBinding,
        id: &RecordId,
    ) -> Result<Option<RecordRow>, OccError>;

    /// Updates the row only if its stored version equals `expected_version`.
    async fn conditional_update(
        &self,
        binding: &TableBinding,
        id: &RecordId,
        expected_version: Version,
        patch: &UpdatePatch,
    ) -> Result<ConditionalWrite, OccError>;

    /// Unconditional write, used only for records that carry no version
    /// column. Conflicts cannot be detected on this path.
    async fn update_unchecked(
        &self,
        binding: &TableBinding,
        id: &RecordId,
        patch: &UpdatePatch,
    ) -> Result<RecordRow, OccError>;
}
