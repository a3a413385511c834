//! The persisted document: an ordered collection of books
//!
//! The whole document is the unit of persistence. Parsing is strict: the root
//! must be an object whose only key is `books`, every element must decode,
//! and no two elements may share an ISBN.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Book;
use crate::schema::{Schema, SchemaValidator};

use super::codec::{decode_book, BookRecord};
use super::errors::{StorageError, StorageResult};

/// Root key of the persisted document
pub const BOOKS_KEY: &str = "books";

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentRecord {
    books: Vec<BookRecord>,
}

/// In-memory document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    books: Vec<Book>,
}

impl Document {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document from books without checking uniqueness.
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn position(&self, isbn: &str) -> Option<usize> {
        self.books.iter().position(|b| b.isbn == isbn)
    }

    /// Returns the book with the given ISBN
    pub fn find(&self, isbn: &str) -> Option<&Book> {
        self.position(isbn).map(|i| &self.books[i])
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.position(isbn).is_some()
    }

    /// Appends a book. Returns false and leaves the document unchanged if
    /// the ISBN is already present.
    pub fn insert(&mut self, book: Book) -> bool {
        if self.contains(&book.isbn) {
            return false;
        }
        self.books.push(book);
        true
    }

    /// Replaces the book with the same ISBN in place, keeping its position.
    /// Returns false if no such book exists.
    pub fn replace(&mut self, book: Book) -> bool {
        match self.position(&book.isbn) {
            Some(i) => {
                self.books[i] = book;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the book with the given ISBN
    pub fn remove(&mut self, isbn: &str) -> Option<Book> {
        self.position(isbn).map(|i| self.books.remove(i))
    }

    /// Serializes the document: pretty-printed JSON with a trailing newline.
    pub fn to_bytes(&self) -> StorageResult<Vec<u8>> {
        let record = DocumentRecord {
            books: self.books.iter().map(BookRecord::from).collect(),
        };
        let mut bytes = serde_json::to_vec_pretty(&record).map_err(|e| {
            StorageError::corrupt_document(format!("failed to serialize document: {}", e))
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Parses a persisted document.
    ///
    /// When `schema` is given, every element of `books` is validated against
    /// it before decoding.
    ///
    /// # Errors
    ///
    /// - `BOOK_DOCUMENT_CORRUPT` if the bytes are not JSON, the root shape is
    ///   wrong, an element cannot be decoded, or an ISBN appears twice
    /// - `BOOK_SCHEMA_VIOLATION` if the schema rejects an element
    pub fn from_bytes(bytes: &[u8], schema: Option<&Schema>) -> StorageResult<Self> {
        let root: Value = serde_json::from_slice(bytes)
            .map_err(|e| StorageError::corrupt_document(format!("invalid JSON: {}", e)))?;

        let obj = root
            .as_object()
            .ok_or_else(|| StorageError::corrupt_document("document root must be an object"))?;

        if let Some(key) = obj.keys().find(|k| k.as_str() != BOOKS_KEY) {
            return Err(StorageError::corrupt_document(format!(
                "unexpected top-level key '{}'",
                key
            )));
        }

        let elements = obj
            .get(BOOKS_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| {
                StorageError::corrupt_document(format!("document must contain a '{}' array", BOOKS_KEY))
            })?;

        if let Some(schema) = schema {
            SchemaValidator::new(schema)
                .validate_books(elements)
                .map_err(StorageError::schema_violation)?;
        }

        let mut seen = HashSet::with_capacity(elements.len());
        let mut books = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            let book = decode_book(element).map_err(|e| {
                StorageError::corrupt_document(format!("books[{}]: {}", i, e.message()))
            })?;
            if !seen.insert(book.isbn.clone()) {
                return Err(StorageError::corrupt_document(format!(
                    "duplicate ISBN '{}' at books[{}]",
                    book.isbn, i
                )));
            }
            books.push(book);
        }

        Ok(Self { books })
    }
}
