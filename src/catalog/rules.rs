//! Business rules applied before a create or update is persisted

use chrono::{Datelike, Utc};

use super::book::Book;
use super::errors::{ValidationError, ValidationResult};

/// Earliest acceptable publication year
pub const MIN_YEAR: i32 = 1450;

/// Latest acceptable publication year: next calendar year (UTC).
pub fn max_year() -> i32 {
    Utc::now().year() + 1
}

/// Validates `book` against the business rules using the current date.
pub fn validate_business(book: &Book) -> ValidationResult<()> {
    validate_business_at(book, max_year())
}

/// Validates `book` with an explicit upper year bound.
///
/// Rules are checked in order: year, price, title, category. The first
/// failure is returned.
pub fn validate_business_at(book: &Book, max_year: i32) -> ValidationResult<()> {
    if book.year < MIN_YEAR || book.year > max_year {
        return Err(ValidationError::YearOutOfRange {
            year: book.year,
            min: MIN_YEAR,
            max: max_year,
        });
    }

    if book.price.is_zero() {
        return Err(ValidationError::PriceNotPositive);
    }

    if book.title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    if book.category.trim().is_empty() {
        return Err(ValidationError::CategoryRequired);
    }

    Ok(())
}
