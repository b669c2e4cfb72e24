use crate::domain::value_objects::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a cache entry the engine owns, shaped `table:kind[:id]` —
/// `products:list` for a collection view, `products:detail:p-1` for a
/// single record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Key of a table's collection view.
    pub fn list(table: &str) -> Result<Self, String> {
        Self::new(format!("{table}:list"))
    }

    /// Key of a single record's detail view.
    pub fn detail(table: &str, id: &RecordId) -> Result<Self, String> {
        Self::new(format!("{table}:detail:{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn table(&self) -> &str {
        self.segments().0
    }

    /// The view kind, e.g. `list` or `detail`.
    pub fn kind(&self) -> &str {
        self.segments().1
    }

    /// The id segment of a detail key.
    pub fn record_id(&self) -> Option<&str> {
        self.segments().2
    }

    fn segments(&self) -> (&str, &str, Option<&str>) {
        // Validated on construction; the first two segments always exist.
        let mut parts = self.0.splitn(3, ':');
        let table = parts.next().unwrap_or_default();
        let kind = parts.next().unwrap_or_default();
        (table, kind, parts.next())
    }

    fn validate(value: &str) -> Result<(), String> {
        let mut parts = value.splitn(3, ':');
        let table = parts.next().unwrap_or_default();
        let kind = parts.next();
        let id = parts.next();

        if table.trim().is_empty() {
            return Err(format!("Cache key must start with a table name: '{value}'"));
        }
        match kind {
            Some(kind) if !kind.trim().is_empty() => {}
            _ => {
                return Err(format!(
                    "Cache key must be shaped table:kind[:id], got: '{value}'"
                ));
            }
        }
        if id.is_some_and(|id| id.trim().is_empty()) {
            return Err(format!("Cache key id segment cannot be empty: '{value}'"));
        }
        Ok(())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}
