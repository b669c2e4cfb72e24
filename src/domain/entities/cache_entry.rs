use crate::domain::entities::RecordRow;
use crate::domain::value_objects::RecordId;
use serde::{Deserialize, Serialize};

/// The two shapes a cache entry can take: a list view holding many records,
/// or a detail view holding one. Snapshot and optimistic apply treat both
/// transparently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachedValue {
    Collection(Vec<RecordRow>),
    Detail(RecordRow),
}

impl CachedValue {
    /// Rewrites every record matching `id` through `transform`, leaving all
    /// other records untouched.
    pub fn apply<F>(&self, id_column: &str, id: &RecordId, transform: F) -> CachedValue
    where
        F: Fn(&RecordRow) -> RecordRow,
    {
        match self {
            CachedValue::Collection(rows) => CachedValue::Collection(
                rows.iter()
                    .map(|row| {
                        if row.matches_id(id_column, id) {
                            transform(row)
                        } else {
                            row.clone()
                        }
                    })
                    .collect(),
            ),
            CachedValue::Detail(row) => {
                if row.matches_id(id_column, id) {
                    CachedValue::Detail(transform(row))
                } else {
                    self.clone()
                }
            }
        }
    }
}
