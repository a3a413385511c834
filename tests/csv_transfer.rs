//! CSV Transfer Tests
//!
//! Export and bulk-merge import against real documents:
//! - export then import into an empty store reproduces the records
//! - merge counts for inserted, updated and skipped rows
//! - imports are per-row: a failure keeps earlier rows committed

use bookstore::bulk::{BulkError, ImportReport, CSV_HEADER};
use bookstore::catalog::{Book, Price};
use bookstore::inventory::{Inventory, InventoryError};
use bookstore::query::ListQuery;
use bookstore::storage::{DocumentStore, StorageErrorCode};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_inventory(temp_dir: &TempDir, name: &str) -> Inventory {
    let store = DocumentStore::open(temp_dir.path().join(name)).expect("Failed to open store");
    Inventory::new(store)
}

fn all_books(inventory: &Inventory) -> Vec<Book> {
    inventory
        .list(&ListQuery::new().sort_by("isbn").page(1, 200))
        .unwrap()
        .items
}

fn awkward_books() -> Vec<Book> {
    vec![
        Book::new(
            "9780306406157",
            "Line one\nLine two",
            "Science",
            1999,
            Price::from_cents(2500),
        )
        .with_authors(["Ada Lovelace", "Charles Babbage"])
        .with_cover("covers/engine.jpg"),
        Book::new(
            "9780262033848",
            "The \"Quoted\" Title",
            "Computer Science",
            2009,
            Price::from_cents(9999),
        )
        .with_title_lang("fr"),
        Book::new("9780131103627", "C", "Programming", 1988, Price::from_cents(1))
            .with_authors(["Kernighan"]),
        Book::new(
            "9780596517748",
            " Dune ",
            " Fiction ",
            1965,
            Price::from_cents(1099),
        )
        .with_authors([" Frank Herbert "])
        .with_cover(" covers/dune.jpg "),
    ]
}

/// Yields `chunks` one per read call and runs `hook` before handing out the
/// chunk at `hook_at`.
struct StagedReader<F: FnMut()> {
    chunks: Vec<Vec<u8>>,
    next: usize,
    hook_at: usize,
    hook: F,
}

impl<F: FnMut()> Read for StagedReader<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(chunk) = self.chunks.get(self.next) else {
            return Ok(0);
        };
        if self.next == self.hook_at {
            (self.hook)();
        }
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        self.next += 1;
        Ok(n)
    }
}

// =============================================================================
// Round trip
// =============================================================================

/// Importing an export into an empty store reproduces every record.
#[test]
fn test_export_import_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let source = create_inventory(&temp_dir, "source.json");
    for book in awkward_books() {
        source.create(book).unwrap();
    }

    let csv = source.export_csv().unwrap();
    assert!(csv.starts_with(CSV_HEADER));

    let target = create_inventory(&temp_dir, "target.json");
    let report = target.import_csv(csv.as_bytes()).unwrap();

    assert_eq!(
        report,
        ImportReport {
            inserted: 4,
            updated: 0,
            skipped: 0
        }
    );
    assert_eq!(all_books(&target), all_books(&source));

    let dune = target.get_by_isbn("9780596517748").unwrap().unwrap();
    assert_eq!(dune.title, "Dune");
    assert_eq!(dune.authors, vec!["Frank Herbert"]);
}

/// Re-importing the same export updates in place.
#[test]
fn test_reimport_counts_updates() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = create_inventory(&temp_dir, "bookstore.json");
    for book in awkward_books() {
        inventory.create(book).unwrap();
    }
    let csv = inventory.export_csv().unwrap();

    let report = inventory.import_csv(csv.as_bytes()).unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.updated, 4);
    assert_eq!(all_books(&inventory).len(), 4);
}

// =============================================================================
// Merge rules
// =============================================================================

/// Short rows and blank ISBNs are skipped; business rules are not applied.
#[test]
fn test_import_skips_malformed_rows_without_business_rules() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = create_inventory(&temp_dir, "bookstore.json");

    let input = "ISBN,Title,Lang,Authors,Category,Cover,Year,Price\n\
                 9780306406157,Old,,\"A, B\",Science,,not-a-year,oops\n\
                 too,few,fields\n\
                 ,No ISBN,en,A,C,,2000,1.00\n\
                 \n\
                 9780262033848,Out of range kept,en,,C,,1200,0\n";
    let report = inventory.import_csv(input.as_bytes()).unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped, 2);

    let old = inventory.get_by_isbn("9780306406157").unwrap().unwrap();
    assert_eq!(old.year, 0);
    assert_eq!(old.price, Price::ZERO);
    assert_eq!(old.title_lang, "en");
    assert_eq!(old.authors, vec!["A".to_string(), "B".to_string()]);

    let raw = inventory.get_by_isbn("9780262033848").unwrap().unwrap();
    assert_eq!(raw.year, 1200);
    assert_eq!(raw.price, Price::ZERO);
}

/// Rows whose ISBN fails format or check-digit validation are skipped and
/// never reach the store.
#[test]
fn test_import_skips_invalid_isbns() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = create_inventory(&temp_dir, "bookstore.json");

    let input = "abc,Letters,en,A,C,,2000,1.00\n\
                 12345,Too short,en,A,C,,2000,1.00\n\
                 9780306406158,Bad check digit,en,A,C,,2000,1.00\n\
                 9780131103627,Good,en,A,C,,2000,1.00\n";
    let report = inventory.import_csv(input.as_bytes()).unwrap();

    assert_eq!(
        report,
        ImportReport {
            inserted: 1,
            updated: 0,
            skipped: 3
        }
    );
    for isbn in ["abc", "12345", "9780306406158"] {
        assert!(inventory.get_by_isbn(isbn).unwrap().is_none());
    }
    assert_eq!(all_books(&inventory).len(), 1);
}

/// Without a header the first row is data.
#[test]
fn test_import_without_header() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = create_inventory(&temp_dir, "bookstore.json");

    let report = inventory
        .import_csv("9780306406157,T,en,A,C,,2001,5.00\r\n".as_bytes())
        .unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(
        inventory.get_by_isbn("9780306406157").unwrap().unwrap().price,
        Price::from_cents(500)
    );
}

// =============================================================================
// Failure handling
// =============================================================================

/// Invalid UTF-8 stops the import as an input error; earlier rows stay.
#[test]
fn test_invalid_utf8_is_input_error() {
    let temp_dir = TempDir::new().unwrap();
    let inventory = create_inventory(&temp_dir, "bookstore.json");

    let mut input = b"9780306406157,T,en,A,C,,2001,5.00\n".to_vec();
    input.extend_from_slice(b"9780262033848,\xFF\xFE,en,A,C,,2001,5.00\n");

    let err = inventory.import_csv(input.as_slice()).unwrap_err();
    match &err {
        InventoryError::Import(BulkError::Input { line, .. }) => assert_eq!(*line, 2),
        other => panic!("expected input error, got {:?}", other),
    }
    assert_eq!(err.code(), "BOOK_IMPORT_INPUT");
    assert_eq!(err.status_code(), 400);
    assert!(inventory.get_by_isbn("9780306406157").unwrap().is_some());
}

/// A store failure mid-import aborts the rest; rows before it were committed.
#[test]
fn test_store_failure_keeps_earlier_rows() {
    let temp_dir = TempDir::new().unwrap();
    let path: PathBuf = temp_dir.path().join("bookstore.json");
    let inventory = Inventory::new(DocumentStore::open(&path).unwrap());

    let committed = Arc::new(Mutex::new(Vec::new()));
    let reader = StagedReader {
        chunks: vec![
            b"9780306406157,First,en,A,C,,2001,5.00\n".to_vec(),
            b"9780262033848,Second,en,A,C,,2001,5.00\n".to_vec(),
            b"9780131103627,Third,en,A,C,,2001,5.00\n".to_vec(),
        ],
        next: 0,
        hook_at: 1,
        hook: {
            let committed = Arc::clone(&committed);
            let path = path.clone();
            move || {
                *committed.lock().unwrap() = fs::read(&path).unwrap();
                fs::write(&path, b"not json").unwrap();
            }
        },
    };

    let err = inventory.import_csv(reader).unwrap_err();

    match &err {
        InventoryError::Import(BulkError::Storage { line, source }) => {
            assert_eq!(*line, 2);
            assert_eq!(source.code(), StorageErrorCode::BookDocumentCorrupt);
        }
        other => panic!("expected storage error, got {:?}", other),
    }
    assert!(err.is_fatal());

    let before_failure = String::from_utf8(committed.lock().unwrap().clone()).unwrap();
    assert!(
        before_failure.contains("9780306406157"),
        "first row must be committed before the second is attempted"
    );
    assert!(!before_failure.contains("9780262033848"));
    assert_eq!(fs::read(&path).unwrap(), b"not json");
}
