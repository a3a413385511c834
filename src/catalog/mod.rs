//! Catalog domain for bookstore
//!
//! Holds the `Book` entity and the rules every persisted book must satisfy.
//!
//! # Design Principles
//!
//! - Books are values; updates produce a new `Book` from a sparse patch
//! - ISBN-13 is the identity and is validated syntactically and by check digit
//! - Prices are fixed-point decimals, never floats
//! - Business rules are applied by the inventory service on create and update,
//!   not by the store

mod book;
mod errors;
mod isbn;
mod price;
mod rules;

pub use book::{normalize_authors, Book, BookPatch, DEFAULT_TITLE_LANG};
pub use errors::{ValidationError, ValidationResult};
pub use isbn::{check_digit, is_valid_isbn13, validate_isbn13};
pub use price::{Price, PriceParseError};
pub use rules::{max_year, validate_business, validate_business_at, MIN_YEAR};
