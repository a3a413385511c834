//! Inventory service
//!
//! The operations callers use. Lookups and uniqueness checks happen inside
//! the store's lock cycle for the mutation they guard, so two concurrent
//! creates of the same ISBN cannot both succeed and an update never
//! resurrects a book deleted in between.

use std::io::Read;

use crate::bulk::{export_csv, CsvImporter, ImportReport};
use crate::catalog::{validate_business, validate_isbn13, Book, BookPatch};
use crate::config::Config;
use crate::observability::{log_event_at, log_event_with_fields, Event, Severity};
use crate::query::{distinct_categories, ListQuery, Page, DEFAULT_PAGE_SIZE};
use crate::storage::{DocumentStore, InsertOutcome, WriteAction};

use super::errors::{InventoryError, InventoryResult};

/// Result of a conditional list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// The caller's token still matches the document
    NotModified,
    /// The document changed; `token` is the fingerprint `page` was read from
    Changed { token: String, page: Page<Book> },
}

/// Book inventory over a document store
#[derive(Debug)]
pub struct Inventory {
    store: DocumentStore,
    default_page_size: usize,
}

impl Inventory {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Opens the store described by `config`.
    pub fn open(config: &Config) -> InventoryResult<Self> {
        let store = DocumentStore::open_with(&config.data_path, config.store_options()?)?;
        Ok(Self::new(store).with_default_page_size(config.default_page_size))
    }

    /// Sets the page size used when a query asks for none
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Filter, sort and paginate the current snapshot.
    pub fn list(&self, query: &ListQuery) -> InventoryResult<Page<Book>> {
        let books = self.store.snapshot()?;
        Ok(query.run_with_default(books, self.default_page_size))
    }

    /// Like [`list`](Self::list), but returns `NotModified` when
    /// `known_token` matches the current fingerprint.
    ///
    /// Tokens compare weakly: a missing `W/` prefix is tolerated.
    pub fn list_if_changed(
        &self,
        known_token: Option<&str>,
        query: &ListQuery,
    ) -> InventoryResult<ListOutcome> {
        if let Some(known) = known_token {
            let current = self.store.fingerprint()?;
            if tokens_match(known, &current) {
                return Ok(ListOutcome::NotModified);
            }
        }

        let (token, books) = self.store.snapshot_with_fingerprint()?;
        let page = query.run_with_default(books, self.default_page_size);
        Ok(ListOutcome::Changed { token, page })
    }

    pub fn get_by_isbn(&self, isbn: &str) -> InventoryResult<Option<Book>> {
        Ok(self.store.find(isbn)?)
    }

    /// Distinct categories, sorted case-insensitively
    pub fn categories(&self) -> InventoryResult<Vec<String>> {
        let books = self.store.snapshot()?;
        Ok(distinct_categories(&books))
    }

    /// Validates and inserts a new book.
    ///
    /// # Errors
    ///
    /// - `Validation` for a bad ISBN or a business-rule violation
    /// - `Conflict` if the ISBN already exists
    pub fn create(&self, candidate: Book) -> InventoryResult<Book> {
        let book = candidate.normalized();

        validate_isbn13(&book.isbn).map_err(|e| self.reject(&book.isbn, e.into()))?;
        validate_business(&book).map_err(|e| self.reject(&book.isbn, e.into()))?;

        match self.store.insert(book.clone())? {
            InsertOutcome::Inserted => {
                log_event_with_fields(Event::BookCreated, &[("isbn", &book.isbn)]);
                Ok(book)
            }
            InsertOutcome::Duplicate => {
                Err(self.reject(&book.isbn, InventoryError::Conflict(book.isbn.clone())))
            }
        }
    }

    /// Applies `patch` to the stored book and persists the result.
    ///
    /// Fields absent from the patch keep their stored values. The merged
    /// book is validated before it replaces the stored one.
    pub fn update(&self, isbn: &str, patch: &BookPatch) -> InventoryResult<Book> {
        validate_isbn13(isbn).map_err(|e| self.reject(isbn, e.into()))?;

        let result = self.store.write(|doc| {
            let updated = match doc.find(isbn) {
                Some(existing) => existing.with_patch(patch),
                None => return WriteAction::Abort(Err(InventoryError::NotFound(isbn.to_string()))),
            };
            if let Err(e) = validate_business(&updated) {
                return WriteAction::Abort(Err(e.into()));
            }
            doc.replace(updated.clone());
            WriteAction::Commit(Ok(updated))
        })?;

        match result {
            Ok(book) => {
                log_event_with_fields(Event::BookUpdated, &[("isbn", isbn)]);
                Ok(book)
            }
            Err(e) => Err(self.reject(isbn, e)),
        }
    }

    /// Removes a book.
    pub fn delete(&self, isbn: &str) -> InventoryResult<()> {
        validate_isbn13(isbn).map_err(|e| self.reject(isbn, e.into()))?;

        match self.store.remove(isbn)? {
            Some(_) => {
                log_event_with_fields(Event::BookDeleted, &[("isbn", isbn)]);
                Ok(())
            }
            None => Err(self.reject(isbn, InventoryError::NotFound(isbn.to_string()))),
        }
    }

    /// CSV rendering of the current snapshot
    pub fn export_csv(&self) -> InventoryResult<String> {
        let books = self.store.snapshot()?;
        let csv = export_csv(&books);
        log_event_with_fields(
            Event::ExportComplete,
            &[("books", &books.len().to_string())],
        );
        Ok(csv)
    }

    /// Best-effort per-row merge of CSV input. Not atomic.
    pub fn import_csv<R: Read>(&self, input: R) -> InventoryResult<ImportReport> {
        Ok(CsvImporter::new(&self.store).import(input)?)
    }

    /// Current change token
    pub fn fingerprint(&self) -> InventoryResult<String> {
        Ok(self.store.fingerprint()?)
    }

    fn reject(&self, isbn: &str, err: InventoryError) -> InventoryError {
        log_event_at(
            Severity::Warn,
            Event::WriteRejected,
            &[("code", err.code()), ("isbn", isbn)],
        );
        err
    }
}

fn tokens_match(a: &str, b: &str) -> bool {
    let strip = |t: &str| {
        let t = t.trim();
        t.strip_prefix("W/").unwrap_or(t).to_string()
    };
    strip(a) == strip(b)
}
