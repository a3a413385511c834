//! Record filtering for list queries
//!
//! Both filters are case-insensitive and treat an absent or blank term as
//! "match everything".

use crate::catalog::Book;

/// Evaluates search and category filters against books
pub struct BookFilter;

impl BookFilter {
    /// Checks if a book passes both filters
    pub fn matches(book: &Book, search: Option<&str>, category: Option<&str>) -> bool {
        Self::matches_search(book, search) && Self::matches_category(book, category)
    }

    /// Case-insensitive substring match against title, any author, or ISBN.
    ///
    /// The term is trimmed before matching.
    pub fn matches_search(book: &Book, term: Option<&str>) -> bool {
        let needle = match active_term(term) {
            Some(t) => t.trim().to_lowercase(),
            None => return true,
        };

        contains_ci(&book.title, &needle)
            || book.authors.iter().any(|a| contains_ci(a, &needle))
            || contains_ci(&book.isbn, &needle)
    }

    /// Case-insensitive exact match on category
    pub fn matches_category(book: &Book, category: Option<&str>) -> bool {
        match active_term(category) {
            Some(c) => book.category.to_lowercase() == c.to_lowercase(),
            None => true,
        }
    }
}

fn active_term(term: Option<&str>) -> Option<&str> {
    term.filter(|t| !t.trim().is_empty())
}

/// `needle` must already be lowercase
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Price;

    fn book() -> Book {
        Book::new("9780131103627", "The C Programming Language", "Programming", 1988, Price::from_cents(4500))
            .with_authors(["Brian Kernighan", "Dennis Ritchie"])
    }

    #[test]
    fn test_blank_terms_match_everything() {
        let b = book();
        assert!(BookFilter::matches(&b, None, None));
        assert!(BookFilter::matches(&b, Some(""), Some("   ")));
    }

    #[test]
    fn test_search_title_case_insensitive() {
        assert!(BookFilter::matches_search(&book(), Some("programming LANG")));
        assert!(!BookFilter::matches_search(&book(), Some("rust")));
    }

    #[test]
    fn test_search_any_author() {
        assert!(BookFilter::matches_search(&book(), Some("ritchie")));
    }

    #[test]
    fn test_search_isbn_and_trims() {
        assert!(BookFilter::matches_search(&book(), Some("  0131103  ")));
    }

    #[test]
    fn test_category_exact_case_insensitive() {
        assert!(BookFilter::matches_category(&book(), Some("PROGRAMMING")));
        assert!(!BookFilter::matches_category(&book(), Some("Program")));
    }
}
