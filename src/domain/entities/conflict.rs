use crate::domain::entities::RecordRow;
use crate::domain::value_objects::{MutationId, RecordId, UpdatePatch, Version};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A detected version mismatch: the update the caller attempted, the version
/// it expected, and the authoritative state the store held instead. Any
/// mismatch counts, in either direction; no ordering is assumed between
/// expected and actual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub mutation_id: MutationId,
    pub record_id: RecordId,
    pub expected_version: Version,
    pub actual_version: Version,
    pub server_data: RecordRow,
    pub attempted_update: UpdatePatch,
    pub occurred_at: DateTime<Utc>,
}

impl ConflictInfo {
    pub fn new(
        mutation_id: MutationId,
        record_id: RecordId,
        expected_version: Version,
        actual_version: Version,
        server_data: RecordRow,
        attempted_update: UpdatePatch,
    ) -> Self {
        Self {
            mutation_id,
            record_id,
            expected_version,
            actual_version,
            server_data,
            attempted_update,
            occurred_at: Utc::now(),
        }
    }
}
