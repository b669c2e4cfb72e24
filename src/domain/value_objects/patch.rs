use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Partial field set to apply to a record. Always a JSON object; whether it
/// touches the version column is checked by the engine against its table
/// binding, since the column name is configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePatch(Map<String, Value>);

impl UpdatePatch {
    pub fn new(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(format!("Update patch must be a JSON object, got: {other}")),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid JSON patch: {e}"))?;
        Self::new(value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<UpdatePatch> for Value {
    fn from(patch: UpdatePatch) -> Self {
        Value::Object(patch.0)
    }
}
