//! CSV bulk-merge importer
//!
//! Each row is upserted in its own exclusive-lock cycle, so the import as a
//! whole is not atomic: a store failure aborts the remaining rows and leaves
//! earlier rows committed, and concurrent readers may observe a partially
//! applied import.
//!
//! Only structural rules apply here: a row needs all eight columns and a
//! valid ISBN-13. Business rules (year range, positive price) are not
//! checked, and unparsable `year`/`price` become 0.

use std::io::{BufReader, Read};

use serde::Serialize;

use crate::catalog::{is_valid_isbn13, Book, Price, DEFAULT_TITLE_LANG};
use crate::observability::{log_event_at, log_event_with_fields, Event, Severity};
use crate::storage::{DocumentStore, UpsertOutcome};

use super::csv::{CsvReader, CsvRecord};
use super::errors::{BulkError, BulkResult};

/// Columns per data row
pub const CSV_COLUMNS: usize = 8;

/// First header column; its presence marks the first row as a header
pub const HEADER_ISBN: &str = "isbn";

/// Counts of what an import did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Merges CSV rows into a store
pub struct CsvImporter<'a> {
    store: &'a DocumentStore,
}

impl<'a> CsvImporter<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Imports every row of `input`.
    ///
    /// # Errors
    ///
    /// Returns `BulkError::Input` if the stream cannot be read and
    /// `BulkError::Storage` if an upsert fails. Rows before the failing one
    /// remain committed.
    pub fn import<R: Read>(&self, input: R) -> BulkResult<ImportReport> {
        log_event_with_fields(
            Event::ImportBegin,
            &[("path", &self.store.path().display().to_string())],
        );

        let mut reader = CsvReader::new(BufReader::new(input));
        let mut report = ImportReport::default();
        let mut first = true;
        let mut last_line = 0;

        loop {
            let record = match reader.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break,
                Err(source) => {
                    let err = BulkError::Input {
                        line: last_line + 1,
                        source,
                    };
                    return Err(self.abort(err, &report));
                }
            };
            last_line = record.line;

            if std::mem::take(&mut first) && is_header(&record) {
                continue;
            }

            let book = match row_to_book(&record) {
                Some(book) => book,
                None => {
                    report.skipped += 1;
                    log_event_at(
                        Severity::Warn,
                        Event::ImportRowSkipped,
                        &[
                            ("fields", &record.fields.len().to_string()),
                            ("line", &record.line.to_string()),
                        ],
                    );
                    continue;
                }
            };

            match self.store.upsert(book) {
                Ok(UpsertOutcome::Inserted) => report.inserted += 1,
                Ok(UpsertOutcome::Replaced) => report.updated += 1,
                Err(source) => {
                    let err = BulkError::Storage {
                        line: record.line,
                        source,
                    };
                    return Err(self.abort(err, &report));
                }
            }
        }

        log_event_with_fields(
            Event::ImportComplete,
            &[
                ("inserted", &report.inserted.to_string()),
                ("skipped", &report.skipped.to_string()),
                ("updated", &report.updated.to_string()),
            ],
        );
        Ok(report)
    }

    fn abort(&self, err: BulkError, report: &ImportReport) -> BulkError {
        log_event_at(
            Severity::Error,
            Event::ImportAborted,
            &[
                ("error", &err.to_string()),
                ("inserted", &report.inserted.to_string()),
                ("updated", &report.updated.to_string()),
            ],
        );
        err
    }
}

fn is_header(record: &CsvRecord) -> bool {
    record
        .fields
        .first()
        .is_some_and(|f| f.trim().eq_ignore_ascii_case(HEADER_ISBN))
}

/// Builds a book from a data row, or `None` if the row is malformed.
///
/// A row is malformed when it has fewer than [`CSV_COLUMNS`] fields or its
/// trimmed ISBN is not a valid ISBN-13. Extra fields are ignored.
fn row_to_book(record: &CsvRecord) -> Option<Book> {
    if record.fields.len() < CSV_COLUMNS {
        return None;
    }
    let f: Vec<&str> = record.fields.iter().map(|s| s.trim()).collect();

    let isbn = f[0];
    if !is_valid_isbn13(isbn) {
        return None;
    }

    let title_lang = if f[2].is_empty() { DEFAULT_TITLE_LANG } else { f[2] };
    let authors = f[3]
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    let cover = (!f[5].is_empty()).then(|| f[5].to_string());
    let year = f[6].parse::<i32>().unwrap_or(0);
    let price = Price::parse(f[7]).unwrap_or(Price::ZERO);

    Some(Book {
        isbn: isbn.to_string(),
        title: f[1].to_string(),
        title_lang: title_lang.to_string(),
        authors,
        category: f[4].to_string(),
        cover,
        year,
        price,
    })
}
