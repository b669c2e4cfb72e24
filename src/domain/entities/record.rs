use crate::domain::value_objects::{RecordId, UpdatePatch, Version};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record as read from (or about to be written to) the row store:
/// a flat JSON object of column values. Shape is dynamic; the id and version
/// columns are addressed by name through the engine's table binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow(Map<String, Value>);

impl RecordRow {
    pub fn new(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(format!("Record must be a JSON object, got: {other}")),
        }
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether this row's id column holds the given id.
    pub fn matches_id(&self, id_column: &str, id: &RecordId) -> bool {
        self.0
            .get(id_column)
            .is_some_and(|value| id.matches_value(value))
    }

    /// The row's version, or `None` when the record carries no version
    /// column (or holds null there) and is therefore not under concurrency
    /// control.
    pub fn version(&self, version_column: &str) -> Option<Version> {
        self.0
            .get(version_column)
            .and_then(Value::as_u64)
            .map(Version::new)
    }

    /// Optimistic prediction of the committed row: the patch fields merged
    /// over the current ones, with the version bumped by one when present.
    /// The store's own increment remains authoritative.
    pub fn apply_patch(&self, patch: &UpdatePatch, version_column: &str) -> RecordRow {
        let mut fields = self.0.clone();
        for (name, value) in patch.fields() {
            fields.insert(name.clone(), value.clone());
        }
        if let Some(version) = self.version(version_column) {
            fields.insert(
                version_column.to_string(),
                Value::from(version.next().value()),
            );
        }
        Self(fields)
    }
}

impl From<RecordRow> for Value {
    fn from(row: RecordRow) -> Self {
        Value::Object(row.0)
    }
}
