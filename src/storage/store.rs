//! Document store
//!
//! `DocumentStore` is the sole authority for reading and writing the
//! persisted collection. It owns the file path, the optional schema and the
//! lock coordinator; every access goes through it.
//!
//! Every read re-parses the file under the shared lock. Every write loads,
//! modifies and atomically replaces the whole file under the exclusive lock.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::catalog::Book;
use crate::observability::{log_event_at, log_event_with_fields, Event, Severity};
use crate::schema::Schema;

use super::document::Document;
use super::errors::{StorageError, StorageErrorCode, StorageResult};
use super::fingerprint::{fingerprint_bytes, fingerprint_file};
use super::lock::LockCoordinator;

/// Default cap on the size of the persisted document (16 MiB)
pub const DEFAULT_MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024;

/// Options applied when opening a store
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Schema enforced on every load
    pub schema: Option<Schema>,
    /// Documents larger than this are rejected as corrupt before parsing
    pub max_document_bytes: u64,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            schema: None,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// What a write closure wants done with the modified document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAction<T> {
    /// Persist the document, then return the value
    Commit(T),
    /// Discard any modification and return the value
    Abort(T),
}

/// Result of [`DocumentStore::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A book with the same ISBN exists; nothing was written
    Duplicate,
}

/// Result of [`DocumentStore::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Single-file book store
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    schema: Option<Schema>,
    max_document_bytes: u64,
    lock: LockCoordinator,
}

impl DocumentStore {
    /// Opens the store at `path` with default options.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Opens the store at `path`.
    ///
    /// Missing parent directories are created. If the file does not exist an
    /// empty document is persisted before returning.
    pub fn open_with(path: impl AsRef<Path>, options: StoreOptions) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let store = Self {
            path,
            schema: options.schema,
            max_document_bytes: options.max_document_bytes,
            lock: LockCoordinator::new(),
        };

        let path_str = store.path.display().to_string();

        if let Some(parent) = non_empty_parent(&store.path) {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::io_failure_at_path(parent, e))?;
        }

        if store.path.exists() {
            log_event_with_fields(Event::StoreOpened, &[("path", &path_str)]);
        } else {
            let _guard = store.lock.write();
            store.persist(&Document::new())?;
            log_event_with_fields(Event::DocumentCreated, &[("path", &path_str)]);
        }

        Ok(store)
    }

    /// Path of the persisted document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema enforced on load, if any
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Loads and parses the document under the shared lock.
    pub fn load(&self) -> StorageResult<Document> {
        let _guard = self.lock.read();
        self.load_unlocked()
    }

    /// Atomically replaces the persisted document under the exclusive lock.
    pub fn save_atomic(&self, doc: &Document) -> StorageResult<()> {
        let _guard = self.lock.write();
        self.persist(doc)
    }

    /// Fingerprint of the current on-disk bytes, recomputed on every call.
    pub fn fingerprint(&self) -> StorageResult<String> {
        let _guard = self.lock.read();
        fingerprint_file(&self.path).map_err(|e| self.log_failure(e))
    }

    /// Runs `f` over a freshly loaded document under the shared lock.
    pub fn read<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Document) -> T,
    {
        let _guard = self.lock.read();
        let doc = self.load_unlocked()?;
        Ok(f(&doc))
    }

    /// Loads, lets `f` modify, and conditionally saves the document, all under
    /// the exclusive lock.
    ///
    /// The document is saved only when `f` returns [`WriteAction::Commit`].
    pub fn write<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Document) -> WriteAction<T>,
    {
        let _guard = self.lock.write();
        let mut doc = self.load_unlocked()?;
        match f(&mut doc) {
            WriteAction::Commit(value) => {
                self.persist(&doc)?;
                Ok(value)
            }
            WriteAction::Abort(value) => Ok(value),
        }
    }

    /// All books in document order
    pub fn snapshot(&self) -> StorageResult<Vec<Book>> {
        let _guard = self.lock.read();
        Ok(self.load_unlocked()?.into_books())
    }

    /// All books together with the fingerprint of the bytes they were parsed
    /// from, read in one shared-lock cycle.
    pub fn snapshot_with_fingerprint(&self) -> StorageResult<(String, Vec<Book>)> {
        let _guard = self.lock.read();
        let bytes = self.read_bytes()?;
        let doc = self.parse(&bytes)?;
        Ok((fingerprint_bytes(&bytes), doc.into_books()))
    }

    /// Looks up one book by ISBN
    pub fn find(&self, isbn: &str) -> StorageResult<Option<Book>> {
        self.read(|doc| doc.find(isbn).cloned())
    }

    /// Appends `book` unless its ISBN is already present.
    pub fn insert(&self, book: Book) -> StorageResult<InsertOutcome> {
        self.write(|doc| {
            if doc.insert(book) {
                WriteAction::Commit(InsertOutcome::Inserted)
            } else {
                WriteAction::Abort(InsertOutcome::Duplicate)
            }
        })
    }

    /// Replaces the book with the same ISBN. Returns false if none exists.
    pub fn replace(&self, book: Book) -> StorageResult<bool> {
        self.write(|doc| {
            if doc.replace(book) {
                WriteAction::Commit(true)
            } else {
                WriteAction::Abort(false)
            }
        })
    }

    /// Removes the book with the given ISBN, returning it.
    pub fn remove(&self, isbn: &str) -> StorageResult<Option<Book>> {
        self.write(|doc| match doc.remove(isbn) {
            Some(book) => WriteAction::Commit(Some(book)),
            None => WriteAction::Abort(None),
        })
    }

    /// Replaces the book if its ISBN exists, otherwise appends it.
    pub fn upsert(&self, book: Book) -> StorageResult<UpsertOutcome> {
        self.write(|doc| {
            let outcome = if doc.contains(&book.isbn) {
                doc.replace(book);
                UpsertOutcome::Replaced
            } else {
                doc.insert(book);
                UpsertOutcome::Inserted
            };
            WriteAction::Commit(outcome)
        })
    }

    fn load_unlocked(&self) -> StorageResult<Document> {
        let bytes = self.read_bytes()?;
        self.parse(&bytes)
    }

    /// Reads the file, refusing documents over the size cap.
    fn read_bytes(&self) -> StorageResult<Vec<u8>> {
        let file = File::open(&self.path)
            .map_err(|e| self.log_failure(StorageError::io_failure_at_path(&self.path, e)))?;

        let mut bytes = Vec::new();
        file.take(self.max_document_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| self.log_failure(StorageError::io_failure_at_path(&self.path, e)))?;

        if bytes.len() as u64 > self.max_document_bytes {
            return Err(self.log_failure(StorageError::corrupt_at_path(
                &self.path,
                format!("document exceeds {} bytes", self.max_document_bytes),
            )));
        }

        Ok(bytes)
    }

    fn parse(&self, bytes: &[u8]) -> StorageResult<Document> {
        Document::from_bytes(bytes, self.schema.as_ref())
            .map_err(|e| self.log_failure(e.with_path(&self.path)))
    }

    /// Writes a temp file beside the target, fsyncs it and renames it over
    /// the target. On failure the temp file is removed and the previous
    /// document stays in place.
    fn persist(&self, doc: &Document) -> StorageResult<()> {
        let bytes = doc.to_bytes()?;
        let dir = non_empty_parent(&self.path).unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::Builder::new()
            .prefix(".bookstore-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| self.log_failure(StorageError::io_failure_at_path(dir, e)))?;

        tmp.write_all(&bytes)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| {
                self.log_failure(StorageError::io_failure(
                    format!("failed to write temp document: {}", e),
                    e,
                ))
            })?;

        tmp.persist(&self.path).map_err(|e| {
            self.log_failure(
                StorageError::io_failure(format!("failed to replace document: {}", e.error), e.error)
                    .with_path(&self.path),
            )
        })?;

        // Make the rename durable
        if let Ok(d) = File::open(dir) {
            let _ = d.sync_all();
        }

        log_event_with_fields(
            Event::DocumentSaved,
            &[
                ("books", &doc.len().to_string()),
                ("bytes", &bytes.len().to_string()),
                ("path", &self.path.display().to_string()),
            ],
        );
        Ok(())
    }

    fn log_failure(&self, err: StorageError) -> StorageError {
        let event = match err.code() {
            StorageErrorCode::BookStorageIoFailure => Event::StorageIoFailure,
            StorageErrorCode::BookDocumentCorrupt => Event::DocumentCorrupt,
            StorageErrorCode::BookSchemaViolation => Event::SchemaViolation,
        };
        let severity = if err.is_fatal() {
            Severity::Fatal
        } else {
            Severity::Error
        };
        log_event_at(
            severity,
            event,
            &[
                ("error", &err.to_string()),
                ("path", &self.path.display().to_string()),
            ],
        );
        err
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
