//! Bulk CSV transfer for bookstore
//!
//! Import is a best-effort per-row merge: malformed rows are skipped, store
//! failures abort the rest. Export renders a snapshot in document order.

mod csv;
mod errors;
mod exporter;
mod importer;

pub use csv::{quote_field, CsvReader, CsvRecord};
pub use errors::{BulkError, BulkResult};
pub use exporter::{export_csv, CSV_HEADER};
pub use importer::{CsvImporter, ImportReport, CSV_COLUMNS, HEADER_ISBN};
