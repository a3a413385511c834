//! Document storage subsystem for bookstore
//!
//! The whole collection lives in one JSON document on disk. The document is
//! the single unit of persistence: every mutation rewrites it in full.
//!
//! # Design Principles
//!
//! - Atomic replace (temp file, fsync, rename); no torn file is ever visible
//! - Shared lock for reads, exclusive lock for load-modify-save
//! - Every read re-parses the file; nothing is cached
//! - Corruption is fatal and never auto-repaired

mod codec;
mod document;
mod errors;
mod fingerprint;
mod lock;
mod store;

pub use codec::{decode_book, encode_book, BookRecord, TitleRecord};
pub use document::{Document, BOOKS_KEY};
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use fingerprint::{fingerprint_bytes, fingerprint_file};
pub use lock::{LockCoordinator, ReadGuard, WriteGuard};
pub use store::{
    DocumentStore, InsertOutcome, StoreOptions, UpsertOutcome, WriteAction,
    DEFAULT_MAX_DOCUMENT_BYTES,
};
