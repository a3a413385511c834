//! Distinct category listing

use std::collections::HashSet;

use crate::catalog::Book;

/// Distinct categories across `books`.
///
/// Values are trimmed and blanks skipped. Duplicates are detected
/// case-insensitively; the first spelling seen in document order is kept.
/// The result is sorted case-insensitively.
pub fn distinct_categories(books: &[Book]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut categories: Vec<String> = books
        .iter()
        .map(|b| b.category.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_lowercase()))
        .map(str::to_string)
        .collect();

    categories.sort_by_cached_key(|c| c.to_lowercase());
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Price;

    fn with_category(category: &str) -> Book {
        Book::new("9780306406157", "T", category, 2000, Price::from_cents(100))
    }

    #[test]
    fn test_distinct_categories() {
        let books: Vec<Book> = ["science", " Fiction ", "", "Science", "   ", "art", "FICTION"]
            .iter()
            .map(|c| with_category(c))
            .collect();

        assert_eq!(distinct_categories(&books), vec!["art", "Fiction", "science"]);
    }

    #[test]
    fn test_empty() {
        assert!(distinct_categories(&[]).is_empty());
    }
}
