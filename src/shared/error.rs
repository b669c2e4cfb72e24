use crate::domain::entities::ConflictInfo;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OccError {
    #[error(
        "version conflict on '{id}': expected version {expected}, store has {actual}",
        id = .0.record_id,
        expected = .0.expected_version,
        actual = .0.actual_version
    )]
    VersionConflict(Box<ConflictInfo>),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl OccError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, OccError::VersionConflict(_))
    }

    /// The conflict details, when this error is a version conflict.
    pub fn conflict(&self) -> Option<&ConflictInfo> {
        match self {
            OccError::VersionConflict(info) => Some(info),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for OccError {
    fn from(err: sqlx::Error) -> Self {
        OccError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for OccError {
    fn from(err: serde_json::Error) -> Self {
        OccError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for OccError {
    fn from(err: anyhow::Error) -> Self {
        OccError::Store(format!("{err:#}"))
    }
}
