use serde::{Deserialize, Serialize};

/// Table, id column and version column an engine instance operates on.
/// Every name is validated as a plain SQL identifier because store adapters
/// interpolate them into statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBinding {
    table: String,
    id_column: String,
    version_column: String,
}

impl TableBinding {
    pub fn new(table: &str, id_column: &str, version_column: &str) -> Result<Self, String> {
        Self::validate_identifier("table", table)?;
        Self::validate_identifier("id column", id_column)?;
        Self::validate_identifier("version column", version_column)?;
        Ok(Self {
            table: table.to_string(),
            id_column: id_column.to_string(),
            version_column: version_column.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn version_column(&self) -> &str {
        &self.version_column
    }

    fn validate_identifier(what: &str, value: &str) -> Result<(), String> {
        let mut chars = value.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("Invalid {what} identifier: '{value}'"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        let binding = TableBinding::new("products", "id", "version").unwrap();
        assert_eq!(binding.table(), "products");
        assert_eq!(binding.id_column(), "id");
        assert_eq!(binding.version_column(), "version");
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(TableBinding::new("products; DROP TABLE users", "id", "version").is_err());
        assert!(TableBinding::new("products", "id\"", "version").is_err());
        assert!(TableBinding::new("", "id", "version").is_err());
        assert!(TableBinding::new("1products", "id", "version").is_err());
    }
}
