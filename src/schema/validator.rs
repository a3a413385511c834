//! Schema validator for book elements
//!
//! Validation semantics:
//! - All required fields are present
//! - No undeclared fields exist
//! - Field types exactly match schema types
//! - Null values are rejected
//!
//! Validation does not mutate the document and reports the first failure.
//! Fields are checked in name order so the reported failure is stable.

use serde_json::Value;
use std::collections::BTreeMap;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{FieldDef, FieldType, Schema};

/// Schema validator bound to one schema.
pub struct SchemaValidator<'a> {
    schema: &'a Schema,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator for `schema`.
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Validates every element of a `books` array.
    ///
    /// Field paths in errors are prefixed with `books[<index>]`.
    pub fn validate_books(&self, books: &[Value]) -> SchemaResult<()> {
        for (i, book) in books.iter().enumerate() {
            self.validate_at(book, &format!("books[{}]", i))?;
        }
        Ok(())
    }

    /// Validates a single book element.
    pub fn validate_book(&self, book: &Value) -> SchemaResult<()> {
        self.validate_at(book, "")
    }

    fn validate_at(&self, book: &Value, path: &str) -> SchemaResult<()> {
        let obj = book.as_object().ok_or_else(|| {
            self.type_error(root_path(path), "object", book)
        })?;
        self.validate_object(obj, &self.schema.fields, path)
    }

    /// Validates an object against field definitions.
    fn validate_object(
        &self,
        obj: &serde_json::Map<String, Value>,
        fields: &BTreeMap<String, FieldDef>,
        path_prefix: &str,
    ) -> SchemaResult<()> {
        // No undeclared fields
        if let Some(key) = obj.keys().find(|k| !fields.contains_key(*k)) {
            return Err(self.fail(ValidationDetails::extra_field(make_path(path_prefix, key))));
        }

        for (field_name, field_def) in fields {
            let field_path = make_path(path_prefix, field_name);

            match obj.get(field_name) {
                Some(Value::Null) => {
                    return Err(self.fail(ValidationDetails::null_value(field_path)));
                }
                Some(value) => self.validate_value(value, &field_def.field_type, &field_path)?,
                None if field_def.required => {
                    return Err(self.fail(ValidationDetails::missing_field(field_path)));
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Validates a value against a field type.
    fn validate_value(
        &self,
        value: &Value,
        expected_type: &FieldType,
        field_path: &str,
    ) -> SchemaResult<()> {
        match expected_type {
            FieldType::String if !value.is_string() => {
                Err(self.type_error(field_path, "string", value))
            }
            FieldType::Int if !(value.is_i64() || value.is_u64()) => {
                Err(self.type_error(field_path, "int", value))
            }
            FieldType::Bool if !value.is_boolean() => {
                Err(self.type_error(field_path, "bool", value))
            }
            FieldType::Float if !value.is_number() => {
                Err(self.type_error(field_path, "float", value))
            }
            FieldType::Object { fields } => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| self.type_error(field_path, "object", value))?;
                self.validate_object(obj, fields, field_path)
            }
            FieldType::Array { element_type } => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| self.type_error(field_path, "array", value))?;

                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}[{}]", field_path, i);
                    if elem.is_null() {
                        return Err(self.fail(ValidationDetails::null_value(elem_path)));
                    }
                    self.validate_value(elem, element_type, &elem_path)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn fail(&self, details: ValidationDetails) -> SchemaError {
        SchemaError::validation_failed(&self.schema.schema_id, details)
    }

    fn type_error(&self, field_path: &str, expected: &str, actual: &Value) -> SchemaError {
        self.fail(ValidationDetails::type_mismatch(
            field_path,
            expected,
            json_type_name(actual),
        ))
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn root_path(path: &str) -> &str {
    if path.is_empty() {
        "$root"
    } else {
        path
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
