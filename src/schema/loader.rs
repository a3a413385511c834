//! Schema loader for the optional external schema file
//!
//! The schema is read once when the store is opened. A configured but
//! missing or malformed schema file prevents the store from opening.

use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;

/// Reads and writes schema files.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Loads a schema from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `BOOK_SCHEMA_MALFORMED` if the file cannot be read, is not
    /// valid JSON, or fails [`Schema::validate_structure`].
    pub fn load(path: &Path) -> SchemaResult<Schema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        Self::parse(&content)
            .map_err(|reason| SchemaError::malformed_schema(path.display().to_string(), reason))
    }

    /// Parses schema JSON and checks its structure.
    fn parse(content: &str) -> Result<Schema, String> {
        let schema: Schema =
            serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {}", e))?;
        schema.validate_structure()?;
        Ok(schema)
    }

    /// Writes a schema file, replacing any existing file.
    pub fn save(path: &Path, schema: &Schema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(path, content).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("book.schema.json");

        SchemaLoader::save(&path, &Schema::book_default()).unwrap();
        let loaded = SchemaLoader::load(&path).unwrap();

        assert_eq!(loaded, Schema::book_default());
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let err = SchemaLoader::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::BookSchemaMalformed);
        assert!(err.message().contains("absent.json"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SchemaLoader::load(&path).unwrap_err();
        assert!(err.message().contains("Invalid JSON"));
    }

    #[test]
    fn test_schema_without_isbn_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no_isbn.json");
        fs::write(
            &path,
            r#"{"schema_id":"book","schema_version":"1","fields":{"title":{"type":"string","required":true}}}"#,
        )
        .unwrap();

        let err = SchemaLoader::load(&path).unwrap_err();
        assert!(err.message().contains("isbn"));
    }
}
