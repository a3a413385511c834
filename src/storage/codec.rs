//! On-disk record codec
//!
//! A persisted book element looks like:
//!
//! ```json
//! {
//!   "isbn": "9780306406157",
//!   "title": { "lang": "en", "text": "Signals" },
//!   "authors": ["Ada"],
//!   "category": "Science",
//!   "cover": "covers/signals.jpg",
//!   "year": 1999,
//!   "price": "25.00"
//! }
//! ```
//!
//! `isbn` and `title.text` are required on decode. Every other field has a
//! default: `lang` is `"en"`, `authors` is empty, `category` is `""`, `year`
//! and `price` are zero. A blank cover is treated as absent in both
//! directions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{normalize_authors, Book, Price, DEFAULT_TITLE_LANG};

use super::errors::{StorageError, StorageResult};

fn default_lang() -> String {
    DEFAULT_TITLE_LANG.to_string()
}

/// Title element with its language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitleRecord {
    #[serde(default = "default_lang")]
    pub lang: String,
    pub text: String,
}

/// Persisted form of a book; field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookRecord {
    pub isbn: String,
    pub title: TitleRecord,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub price: Price,
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self {
            isbn: book.isbn.clone(),
            title: TitleRecord {
                lang: book.title_lang.clone(),
                text: book.title.clone(),
            },
            authors: book.authors.clone(),
            category: book.category.clone(),
            cover: non_blank(book.cover.as_deref()),
            year: book.year,
            price: book.price,
        }
    }
}

impl BookRecord {
    /// Converts the record into the in-memory entity.
    pub fn into_book(self) -> Book {
        Book {
            isbn: self.isbn,
            title: self.title.text,
            title_lang: self.title.lang,
            authors: normalize_authors(self.authors),
            category: self.category,
            cover: non_blank(self.cover.as_deref()),
            year: self.year,
            price: self.price,
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.filter(|c| !c.trim().is_empty()).map(str::to_string)
}

/// Encodes a book into its on-disk JSON element.
pub fn encode_book(book: &Book) -> StorageResult<Value> {
    serde_json::to_value(BookRecord::from(book))
        .map_err(|e| StorageError::corrupt_document(format!("failed to encode book: {}", e)))
}

/// Decodes one on-disk JSON element into a book.
///
/// # Errors
///
/// Returns `BOOK_DOCUMENT_CORRUPT` when a required field is missing, a field
/// has the wrong type, or an undeclared field is present.
pub fn decode_book(value: &Value) -> StorageResult<Book> {
    BookRecord::deserialize(value)
        .map(BookRecord::into_book)
        .map_err(|e| StorageError::corrupt_document(format!("invalid book element: {}", e)))
}
