//! Query engine for bookstore
//!
//! Pure, synchronous operations over a snapshot of all books: filter, sort,
//! paginate, and distinct categories. Nothing here touches the store.

mod categories;
mod filters;
mod list;
mod paginate;
mod sorter;

pub use categories::distinct_categories;
pub use filters::BookFilter;
pub use list::ListQuery;
pub use paginate::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use sorter::{BookSorter, SortKey, SortOrder};
