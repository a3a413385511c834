//! List query: filter, sort, paginate over a snapshot

use serde::Deserialize;

use crate::catalog::Book;

use super::filters::BookFilter;
use super::paginate::{Page, PageRequest, DEFAULT_PAGE_SIZE};
use super::sorter::{BookSorter, SortKey, SortOrder};

/// Raw list parameters as supplied by a caller.
///
/// Nothing here is validated; out-of-range values are normalized when the
/// query runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: i64,
    pub page_size: i64,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn page(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey::parse(self.sort_by.as_deref())
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::parse(self.order.as_deref())
    }

    /// Runs the query with the standard default page size.
    pub fn run(&self, books: Vec<Book>) -> Page<Book> {
        self.run_with_default(books, DEFAULT_PAGE_SIZE)
    }

    /// Runs the query: filter, then stable sort, then paginate.
    pub fn run_with_default(&self, books: Vec<Book>, default_page_size: usize) -> Page<Book> {
        let mut matching: Vec<Book> = books
            .into_iter()
            .filter(|b| BookFilter::matches(b, self.search.as_deref(), self.category.as_deref()))
            .collect();

        BookSorter::sort(&mut matching, self.sort_key(), self.sort_order());

        PageRequest::with_default(self.page, self.page_size, default_page_size).apply(matching)
    }
}
