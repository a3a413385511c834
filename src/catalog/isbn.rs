//! ISBN-13 syntax and check digit validation
//!
//! An ISBN-13 is exactly 13 ASCII digits. The first 12 digits are weighted
//! 1,3,1,3,... and the 13th digit must equal `(10 - sum % 10) % 10`.

use super::errors::{ValidationError, ValidationResult};

/// Number of digits in an ISBN-13
const ISBN13_LEN: usize = 13;

/// Computes the ISBN-13 check digit for the first 12 digits.
///
/// `digits` must hold the numeric values (0-9), not ASCII bytes.
pub fn check_digit(digits: &[u8; 12]) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let weight = if i % 2 == 0 { 1 } else { 3 };
            u32::from(*d) * weight
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// Validates an ISBN-13 string.
///
/// # Errors
///
/// - `IsbnFormat` if the input is not exactly 13 ASCII digits
/// - `IsbnChecksum` if the check digit does not match
pub fn validate_isbn13(isbn: &str) -> ValidationResult<()> {
    let bytes = isbn.as_bytes();
    if bytes.len() != ISBN13_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(ValidationError::IsbnFormat(isbn.to_string()));
    }

    let mut first12 = [0u8; 12];
    for (slot, b) in first12.iter_mut().zip(bytes) {
        *slot = b - b'0';
    }

    if check_digit(&first12) != bytes[12] - b'0' {
        return Err(ValidationError::IsbnChecksum(isbn.to_string()));
    }

    Ok(())
}

/// Returns true if `isbn` is a syntactically valid ISBN-13 with a correct check digit.
pub fn is_valid_isbn13(isbn: &str) -> bool {
    validate_isbn13(isbn).is_ok()
}
