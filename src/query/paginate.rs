//! Pagination

use serde::Serialize;

/// Page size used when none (or a non-positive one) is requested
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page size served
pub const MAX_PAGE_SIZE: usize = 200;

/// A normalized page request: `page >= 1`, `1 <= page_size <= MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    /// Clamps raw inputs using [`DEFAULT_PAGE_SIZE`].
    pub fn new(page: i64, page_size: i64) -> Self {
        Self::with_default(page, page_size, DEFAULT_PAGE_SIZE)
    }

    /// Clamps raw inputs.
    ///
    /// - `page_size <= 0` becomes `default_size`
    /// - `page_size > MAX_PAGE_SIZE` becomes `MAX_PAGE_SIZE`
    /// - `page < 1` becomes 1
    pub fn with_default(page: i64, page_size: i64, default_size: usize) -> Self {
        let default_size = default_size.clamp(1, MAX_PAGE_SIZE);
        let page_size = if page_size <= 0 {
            default_size
        } else {
            usize::try_from(page_size).map_or(MAX_PAGE_SIZE, |s| s.min(MAX_PAGE_SIZE))
        };
        let page = if page < 1 {
            1
        } else {
            usize::try_from(page).unwrap_or(usize::MAX)
        };
        Self { page, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Cuts this page out of `items`. `total` is the length before cutting.
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let items = items
            .into_iter()
            .skip(self.offset())
            .take(self.page_size)
            .collect();
        Page { items, total }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Count after filtering, before pagination
    pub total: usize,
}
