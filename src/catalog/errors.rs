//! Validation errors raised by catalog rules

use thiserror::Error;

/// Result type for catalog validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A candidate book failed a syntax or business rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ISBN must be 13 digits: '{0}'")]
    IsbnFormat(String),

    #[error("Invalid ISBN-13 checksum: '{0}'")]
    IsbnChecksum(String),

    #[error("Year must be between {min} and {max}, got {year}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Price must be greater than 0")]
    PriceNotPositive,

    #[error("Title is required")]
    TitleRequired,

    #[error("Category is required")]
    CategoryRequired,
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::IsbnFormat(_) => "BOOK_INVALID_ISBN",
            ValidationError::IsbnChecksum(_) => "BOOK_INVALID_ISBN_CHECKSUM",
            ValidationError::YearOutOfRange { .. } => "BOOK_INVALID_YEAR",
            ValidationError::PriceNotPositive => "BOOK_INVALID_PRICE",
            ValidationError::TitleRequired => "BOOK_TITLE_REQUIRED",
            ValidationError::CategoryRequired => "BOOK_CATEGORY_REQUIRED",
        }
    }
}
