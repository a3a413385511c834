//! Result sorting for list queries
//!
//! Sort is stable in both directions: ties keep document order.

use std::cmp::Ordering;

use crate::catalog::Book;

/// Sortable book fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Isbn,
    #[default]
    Title,
    /// First author, or the empty string
    Author,
    Year,
    Price,
}

impl SortKey {
    /// Parses a sort key case-insensitively. Unknown or absent keys fall back
    /// to `Title`.
    pub fn parse(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("isbn") => SortKey::Isbn,
            Some("author") => SortKey::Author,
            Some("year") => SortKey::Year,
            Some("price") => SortKey::Price,
            _ => SortKey::Title,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Isbn => "isbn",
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Year => "year",
            SortKey::Price => "price",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only `desc` (any case) selects descending.
    pub fn parse(order: Option<&str>) -> Self {
        match order {
            Some(o) if o.trim().eq_ignore_ascii_case("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Sorts books by one key
pub struct BookSorter;

impl BookSorter {
    /// Sorts in place. String keys compare ordinally.
    pub fn sort(books: &mut [Book], key: SortKey, order: SortOrder) {
        books.sort_by(|a, b| {
            let ordering = Self::compare(a, b, key);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    fn compare(a: &Book, b: &Book, key: SortKey) -> Ordering {
        match key {
            SortKey::Isbn => a.isbn.cmp(&b.isbn),
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Author => a.first_author().cmp(b.first_author()),
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Price => a.price.cmp(&b.price),
        }
    }
}
