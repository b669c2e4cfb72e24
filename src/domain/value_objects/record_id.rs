use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque key addressing one record. Ids travel as strings, but id columns
/// may be TEXT or INTEGER; [`RecordId::matches_value`] compares against
/// either through the canonical decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether an id column value holds this id.
    pub fn matches_value(&self, value: &Value) -> bool {
        match value {
            Value::String(text) => text == &self.0,
            Value::Number(number) => number.to_string() == self.0,
            _ => false,
        }
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}
