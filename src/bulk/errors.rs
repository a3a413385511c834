//! Bulk transfer errors

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for bulk operations
pub type BulkResult<T> = Result<T, BulkError>;

/// An import stopped before the end of its input.
///
/// Rows committed before the failure stay committed.
#[derive(Debug, Error)]
pub enum BulkError {
    /// The input stream could not be read
    #[error("failed to read import input at line {line}: {source}")]
    Input {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// A row's upsert failed in the store
    #[error("import aborted at line {line}: {source}")]
    Storage {
        line: usize,
        #[source]
        source: StorageError,
    },
}

impl BulkError {
    /// Line of the input at which the import stopped
    pub fn line(&self) -> usize {
        match self {
            BulkError::Input { line, .. } | BulkError::Storage { line, .. } => *line,
        }
    }
}
