//! CSV export

use crate::catalog::Book;

use super::csv::quote_field;

/// Header row written by [`export_csv`]
pub const CSV_HEADER: &str = "isbn,title,titleLang,authors,category,cover,year,price";

/// Renders books as CSV in the order given.
///
/// Text fields are always quoted; `year` and `price` are bare invariant
/// numbers. Authors are joined with `", "`. Rows end with `\n`.
///
/// An author name that itself contains a comma comes back from an import as
/// separate authors.
pub fn export_csv(books: &[Book]) -> String {
    let mut out = String::with_capacity(64 * (books.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for book in books {
        let row = [
            quote_field(&book.isbn),
            quote_field(&book.title),
            quote_field(&book.title_lang),
            quote_field(&book.authors.join(", ")),
            quote_field(&book.category),
            quote_field(book.cover.as_deref().unwrap_or("")),
            book.year.to_string(),
            book.price.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}
