//! Schema subsystem for bookstore
//!
//! An optional external schema describes the shape of each element of the
//! persisted `books` array. When configured, it is enforced on every load.
//!
//! # Design Principles
//!
//! - Loaded once when the store opens; a bad schema file fails the open
//! - No nulls, no undeclared fields, exact type match
//! - Deterministic validation

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, ValidationDetails};
pub use loader::SchemaLoader;
pub use types::{FieldDef, FieldType, Schema, IDENTITY_FIELD};
pub use validator::SchemaValidator;
