//! Schema type definitions
//!
//! Supported types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float: any JSON number
//! - object: Nested object with field schema
//! - array: Homogeneous array with element type

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field that every book schema must declare as a required string
pub const IDENTITY_FIELD: &str = "isbn";

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// Boolean
    Bool,
    /// Any JSON number
    Float,
    /// Nested object with its own field schema
    Object {
        /// Nested field definitions
        fields: BTreeMap<String, FieldDef>,
    },
    /// Homogeneous array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::Float => "float",
            FieldType::Object { .. } => "object",
            FieldType::Array { .. } => "array",
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    pub required: bool,
}

impl FieldDef {
    /// Create a required string field
    pub fn required_string() -> Self {
        Self {
            field_type: FieldType::String,
            required: true,
        }
    }

    /// Create an optional string field
    pub fn optional_string() -> Self {
        Self {
            field_type: FieldType::String,
            required: false,
        }
    }

    /// Create a required int field
    pub fn required_int() -> Self {
        Self {
            field_type: FieldType::Int,
            required: true,
        }
    }

    /// Create a required object field
    pub fn required_object(fields: BTreeMap<String, FieldDef>) -> Self {
        Self {
            field_type: FieldType::Object { fields },
            required: true,
        }
    }

    /// Create a required array field
    pub fn required_array(element_type: FieldType) -> Self {
        Self {
            field_type: FieldType::Array {
                element_type: Box::new(element_type),
            },
            required: true,
        }
    }

    /// Create an optional array field
    pub fn optional_array(element_type: FieldType) -> Self {
        Self {
            field_type: FieldType::Array {
                element_type: Box::new(element_type),
            },
            required: false,
        }
    }
}

/// Schema applied to every element of the document's `books` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema identifier, reported in validation errors
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions
    pub fields: BTreeMap<String, FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: BTreeMap<String, FieldDef>,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            fields,
        }
    }

    /// The schema matching the layout written by `storage::codec`.
    pub fn book_default() -> Self {
        let mut title = BTreeMap::new();
        title.insert("lang".into(), FieldDef::required_string());
        title.insert("text".into(), FieldDef::required_string());

        let mut fields = BTreeMap::new();
        fields.insert(IDENTITY_FIELD.into(), FieldDef::required_string());
        fields.insert("title".into(), FieldDef::required_object(title));
        fields.insert("authors".into(), FieldDef::required_array(FieldType::String));
        fields.insert("category".into(), FieldDef::required_string());
        fields.insert("cover".into(), FieldDef::optional_string());
        fields.insert("year".into(), FieldDef::required_int());
        fields.insert("price".into(), FieldDef::required_string());

        Self::new("book", "1", fields)
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        match self.fields.get(IDENTITY_FIELD) {
            None => Err(format!("Schema must define an '{}' field", IDENTITY_FIELD)),
            Some(def) if !def.required => {
                Err(format!("'{}' field must be required", IDENTITY_FIELD))
            }
            Some(def) if def.field_type != FieldType::String => {
                Err(format!("'{}' field must be a string", IDENTITY_FIELD))
            }
            Some(_) => Ok(()),
        }
    }
}
