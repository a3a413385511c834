//! Storage error types
//!
//! Error codes:
//! - BOOK_STORAGE_IO_FAILURE (ERROR severity)
//! - BOOK_DOCUMENT_CORRUPT (FATAL severity)
//! - BOOK_SCHEMA_VIOLATION (FATAL severity)

use std::fmt;
use std::io;
use std::path::Path;

use crate::schema::SchemaError;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the document is still usable
    Error,
    /// Document is unusable until repaired by hand
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Disk or permission failure
    BookStorageIoFailure,
    /// Document could not be parsed or is structurally invalid
    BookDocumentCorrupt,
    /// Document does not conform to the configured schema
    BookSchemaViolation,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::BookStorageIoFailure => "BOOK_STORAGE_IO_FAILURE",
            StorageErrorCode::BookDocumentCorrupt => "BOOK_DOCUMENT_CORRUPT",
            StorageErrorCode::BookSchemaViolation => "BOOK_SCHEMA_VIOLATION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::BookStorageIoFailure => Severity::Error,
            StorageErrorCode::BookDocumentCorrupt => Severity::Fatal,
            StorageErrorCode::BookSchemaViolation => Severity::Fatal,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error type with full context
#[derive(Debug)]
pub struct StorageError {
    /// Error code
    code: StorageErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
    /// Underlying schema failure if applicable
    schema: Option<SchemaError>,
}

impl StorageError {
    /// Create a storage I/O failure
    pub fn io_failure(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::BookStorageIoFailure,
            message: message.into(),
            details: None,
            source: Some(source),
            schema: None,
        }
    }

    /// Create a storage I/O failure naming the file involved
    pub fn io_failure_at_path(path: &Path, source: io::Error) -> Self {
        Self {
            code: StorageErrorCode::BookStorageIoFailure,
            message: source.to_string(),
            details: Some(format!("path: {}", path.display())),
            source: Some(source),
            schema: None,
        }
    }

    /// Create a corrupt document error (FATAL)
    pub fn corrupt_document(message: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::BookDocumentCorrupt,
            message: message.into(),
            details: None,
            source: None,
            schema: None,
        }
    }

    /// Create a corrupt document error naming the file involved
    pub fn corrupt_at_path(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            code: StorageErrorCode::BookDocumentCorrupt,
            message: reason.into(),
            details: Some(format!("path: {}", path.display())),
            source: None,
            schema: None,
        }
    }

    /// Create a schema violation error (FATAL)
    pub fn schema_violation(err: SchemaError) -> Self {
        Self {
            code: StorageErrorCode::BookSchemaViolation,
            message: err.message().to_string(),
            details: err.schema_id().map(|id| format!("schema: {}", id)),
            source: None,
            schema: Some(err),
        }
    }

    /// Attaches a path to an error that does not yet carry details
    pub fn with_path(mut self, path: &Path) -> Self {
        if self.details.is_none() {
            self.details = Some(format!("path: {}", path.display()));
        }
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns the schema failure behind a schema violation
    pub fn schema_error(&self) -> Option<&SchemaError> {
        self.schema.as_ref()
    }

    /// Returns whether this error is fatal
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Some(ref e) = self.source {
            return Some(e as &(dyn std::error::Error + 'static));
        }
        self.schema
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
