//! Observable events for bookstore
//!
//! Events are explicit and typed; the string form is the `event` field of a
//! log line.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// External schema loaded
    SchemaLoaded,
    /// Store opened on an existing document
    StoreOpened,
    /// Document was absent and an empty one was persisted
    DocumentCreated,

    // Persistence
    /// Document atomically replaced on disk
    DocumentSaved,
    /// Persisted document could not be parsed (FATAL)
    DocumentCorrupt,
    /// Persisted document failed the configured schema (FATAL)
    SchemaViolation,
    /// Disk or permission failure during load or save
    StorageIoFailure,

    // Mutations
    /// Book inserted
    BookCreated,
    /// Book replaced
    BookUpdated,
    /// Book removed
    BookDeleted,
    /// Mutation rejected by validation or lookup
    WriteRejected,

    // Bulk transfer
    /// CSV import started
    ImportBegin,
    /// CSV row skipped as malformed
    ImportRowSkipped,
    /// CSV import finished
    ImportComplete,
    /// CSV import aborted by a store failure
    ImportAborted,
    /// CSV export rendered
    ExportComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::DocumentCreated => "DOCUMENT_CREATED",

            Event::DocumentSaved => "DOCUMENT_SAVED",
            Event::DocumentCorrupt => "DOCUMENT_CORRUPT",
            Event::SchemaViolation => "SCHEMA_VIOLATION",
            Event::StorageIoFailure => "STORAGE_IO_FAILURE",

            Event::BookCreated => "BOOK_CREATED",
            Event::BookUpdated => "BOOK_UPDATED",
            Event::BookDeleted => "BOOK_DELETED",
            Event::WriteRejected => "WRITE_REJECTED",

            Event::ImportBegin => "IMPORT_BEGIN",
            Event::ImportRowSkipped => "IMPORT_ROW_SKIPPED",
            Event::ImportComplete => "IMPORT_COMPLETE",
            Event::ImportAborted => "IMPORT_ABORTED",
            Event::ExportComplete => "EXPORT_COMPLETE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::DocumentCorrupt | Event::SchemaViolation)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
