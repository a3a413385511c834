//! # Inventory Errors

use thiserror::Error;

use crate::bulk::BulkError;
use crate::catalog::ValidationError;
use crate::storage::StorageError;

/// Result type for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Closed set of failures returned by the inventory service
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Book with ISBN {0} already exists")]
    Conflict(String),

    #[error("Book with ISBN {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Import(#[from] BulkError),
}

impl InventoryError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            InventoryError::Conflict(_) => "BOOK_CONFLICT",
            InventoryError::NotFound(_) => "BOOK_NOT_FOUND",
            InventoryError::Validation(e) => e.code(),
            InventoryError::Storage(e) => e.code().code(),
            InventoryError::Import(BulkError::Input { .. }) => "BOOK_IMPORT_INPUT",
            InventoryError::Import(BulkError::Storage { source, .. }) => source.code().code(),
        }
    }

    /// Transport status hint
    pub fn status_code(&self) -> u16 {
        match self {
            InventoryError::Conflict(_) => 409,
            InventoryError::NotFound(_) => 404,
            InventoryError::Validation(_) => 400,
            InventoryError::Storage(_) => 500,
            InventoryError::Import(BulkError::Input { .. }) => 400,
            InventoryError::Import(BulkError::Storage { .. }) => 500,
        }
    }

    /// Returns true if the failure leaves the document unusable
    pub fn is_fatal(&self) -> bool {
        match self {
            InventoryError::Storage(e) => e.is_fatal(),
            InventoryError::Import(BulkError::Storage { source, .. }) => source.is_fatal(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_status_codes() {
        assert_eq!(InventoryError::Conflict("x".into()).status_code(), 409);
        assert_eq!(InventoryError::NotFound("x".into()).status_code(), 404);
        assert_eq!(
            InventoryError::from(ValidationError::PriceNotPositive).status_code(),
            400
        );
        assert_eq!(
            InventoryError::from(StorageError::corrupt_document("bad")).status_code(),
            500
        );
    }

    #[test]
    fn test_codes_delegate() {
        let err = InventoryError::from(ValidationError::TitleRequired);
        assert_eq!(err.code(), "BOOK_TITLE_REQUIRED");

        let err = InventoryError::from(StorageError::io_failure(
            "disk",
            io::Error::new(io::ErrorKind::Other, "disk"),
        ));
        assert_eq!(err.code(), "BOOK_STORAGE_IO_FAILURE");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_import_errors() {
        let input = InventoryError::from(BulkError::Input {
            line: 3,
            source: io::Error::new(io::ErrorKind::InvalidData, "not utf-8"),
        });
        assert_eq!(input.status_code(), 400);
        assert_eq!(input.code(), "BOOK_IMPORT_INPUT");

        let storage = InventoryError::from(BulkError::Storage {
            line: 9,
            source: StorageError::corrupt_document("bad"),
        });
        assert_eq!(storage.status_code(), 500);
        assert!(storage.is_fatal());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            InventoryError::NotFound("9780306406157".into()).to_string(),
            "Book with ISBN 9780306406157 not found"
        );
    }
}
