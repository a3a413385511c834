//! Inventory Operation Tests
//!
//! End-to-end behavior of the inventory service over a real document:
//! - create, read, update and delete with their error kinds
//! - list filtering, ordering and pagination
//! - categories
//! - conditional list via the change token

use bookstore::catalog::{check_digit, Book, BookPatch, Price};
use bookstore::inventory::{Inventory, InventoryError, ListOutcome};
use bookstore::query::ListQuery;
use bookstore::storage::DocumentStore;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn create_inventory() -> (TempDir, Inventory) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = DocumentStore::open(temp_dir.path().join("bookstore.json"))
        .expect("Failed to open store");
    (temp_dir, Inventory::new(store))
}

/// Builds a valid ISBN-13 from a serial number.
fn isbn(serial: u32) -> String {
    let prefix = format!("978{:09}", serial);
    let mut digits = [0u8; 12];
    for (slot, b) in digits.iter_mut().zip(prefix.bytes()) {
        *slot = b - b'0';
    }
    format!("{}{}", prefix, check_digit(&digits))
}

fn make_book(serial: u32, title: &str, category: &str, cents: u64) -> Book {
    Book::new(isbn(serial), title, category, 2000, Price::from_cents(cents))
}

fn isbns(books: &[Book]) -> Vec<String> {
    books.iter().map(|b| b.isbn.clone()).collect()
}

// =============================================================================
// Create / Get
// =============================================================================

/// A created book is returned with blank authors removed and can be read back.
#[test]
fn test_create_then_get() {
    let (_dir, inventory) = create_inventory();
    let candidate = make_book(1, "Dune", "Fiction", 999).with_authors(["Frank Herbert", "  "]);

    let created = inventory.create(candidate).unwrap();
    assert_eq!(created.authors, vec!["Frank Herbert".to_string()]);

    let fetched = inventory.get_by_isbn(&isbn(1)).unwrap();
    assert_eq!(fetched, Some(created));
}

/// Surrounding whitespace is trimmed on create and on update.
#[test]
fn test_create_and_update_store_trimmed_values() {
    let (_dir, inventory) = create_inventory();
    let candidate = make_book(2, " Dune ", " Fiction ", 999)
        .with_authors([" Frank Herbert "])
        .with_title_lang(" en ")
        .with_cover(" covers/dune.jpg ");

    let created = inventory.create(candidate).unwrap();
    assert_eq!(created.title, "Dune");
    assert_eq!(created.category, "Fiction");
    assert_eq!(created.title_lang, "en");
    assert_eq!(created.authors, vec!["Frank Herbert".to_string()]);
    assert_eq!(created.cover.as_deref(), Some("covers/dune.jpg"));

    let patch = BookPatch {
        title: Some("  Dune Messiah\t".into()),
        authors: Some(vec![" Frank Herbert ".into(), " Brian Herbert".into()]),
        ..Default::default()
    };
    let updated = inventory.update(&isbn(2), &patch).unwrap();
    assert_eq!(updated.title, "Dune Messiah");
    assert_eq!(updated.authors, vec!["Frank Herbert", "Brian Herbert"]);
    assert_eq!(inventory.get_by_isbn(&isbn(2)).unwrap(), Some(updated));
}

/// Unknown ISBNs read as absent, not as an error.
#[test]
fn test_get_missing_is_none() {
    let (_dir, inventory) = create_inventory();
    assert_eq!(inventory.get_by_isbn(&isbn(42)).unwrap(), None);
    assert_eq!(inventory.get_by_isbn("not-an-isbn").unwrap(), None);
}

/// A second create with the same ISBN is a conflict and changes nothing.
#[test]
fn test_create_duplicate_is_conflict() {
    let (_dir, inventory) = create_inventory();
    inventory.create(make_book(1, "Dune", "Fiction", 999)).unwrap();
    let token = inventory.fingerprint().unwrap();

    let err = inventory
        .create(make_book(1, "Other", "Fiction", 100))
        .unwrap_err();

    assert!(matches!(err, InventoryError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
    assert_eq!(inventory.fingerprint().unwrap(), token, "conflict must not write");
    assert_eq!(inventory.get_by_isbn(&isbn(1)).unwrap().unwrap().title, "Dune");
}

/// Each business rule maps to its own validation code.
#[test]
fn test_create_validation_codes() {
    let (_dir, inventory) = create_inventory();
    let base = make_book(1, "Dune", "Fiction", 999);

    let cases = vec![
        (Book { isbn: "123".into(), ..base.clone() }, "BOOK_INVALID_ISBN"),
        (
            Book { isbn: "9780306406158".into(), ..base.clone() },
            "BOOK_INVALID_ISBN_CHECKSUM",
        ),
        (Book { year: 1449, ..base.clone() }, "BOOK_INVALID_YEAR"),
        (Book { price: Price::ZERO, ..base.clone() }, "BOOK_INVALID_PRICE"),
        (Book { title: "  ".into(), ..base.clone() }, "BOOK_TITLE_REQUIRED"),
        (Book { category: "".into(), ..base.clone() }, "BOOK_CATEGORY_REQUIRED"),
    ];

    for (candidate, code) in cases {
        let err = inventory.create(candidate).unwrap_err();
        assert_eq!(err.code(), code);
        assert_eq!(err.status_code(), 400);
    }

    assert!(inventory.list(&ListQuery::new()).unwrap().items.is_empty());
}

// =============================================================================
// Update / Delete
// =============================================================================

/// Fields absent from the patch keep their stored values.
#[test]
fn test_update_merges_patch() {
    let (_dir, inventory) = create_inventory();
    let original = make_book(1, "Dune", "Fiction", 999)
        .with_authors(["Frank Herbert"])
        .with_cover("covers/dune.jpg");
    inventory.create(original.clone()).unwrap();

    let patch = BookPatch {
        price: Some(Price::from_cents(1299)),
        ..Default::default()
    };
    let updated = inventory.update(&isbn(1), &patch).unwrap();

    assert_eq!(updated.price, Price::from_cents(1299));
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.authors, original.authors);
    assert_eq!(updated.cover, original.cover);
    assert_eq!(inventory.get_by_isbn(&isbn(1)).unwrap(), Some(updated));
}

/// Updating a missing book is NotFound.
#[test]
fn test_update_missing_is_not_found() {
    let (_dir, inventory) = create_inventory();
    let err = inventory.update(&isbn(9), &BookPatch::default()).unwrap_err();
    assert!(matches!(err, InventoryError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

/// A patch that breaks a business rule is rejected and nothing is written.
#[test]
fn test_update_validates_merged_book() {
    let (_dir, inventory) = create_inventory();
    inventory.create(make_book(1, "Dune", "Fiction", 999)).unwrap();
    let token = inventory.fingerprint().unwrap();

    let patch = BookPatch {
        year: Some(1000),
        ..Default::default()
    };
    let err = inventory.update(&isbn(1), &patch).unwrap_err();

    assert_eq!(err.code(), "BOOK_INVALID_YEAR");
    assert_eq!(inventory.fingerprint().unwrap(), token);
}

/// Delete removes the book; a second delete is NotFound.
#[test]
fn test_delete() {
    let (_dir, inventory) = create_inventory();
    inventory.create(make_book(1, "Dune", "Fiction", 999)).unwrap();

    inventory.delete(&isbn(1)).unwrap();
    assert_eq!(inventory.get_by_isbn(&isbn(1)).unwrap(), None);

    let err = inventory.delete(&isbn(1)).unwrap_err();
    assert!(matches!(err, InventoryError::NotFound(_)));
}

/// Delete checks ISBN syntax before touching the store.
#[test]
fn test_delete_invalid_isbn() {
    let (_dir, inventory) = create_inventory();
    let err = inventory.delete("97803064061").unwrap_err();
    assert_eq!(err.code(), "BOOK_INVALID_ISBN");
}

// =============================================================================
// List
// =============================================================================

/// 25 records, page 3 of size 10 holds the last 5.
#[test]
fn test_pagination_last_partial_page() {
    let (_dir, inventory) = create_inventory();
    for serial in 1..=25 {
        let title = format!("Title {:02}", serial);
        inventory.create(make_book(serial, &title, "Fiction", 100)).unwrap();
    }

    let page = inventory.list(&ListQuery::new().page(3, 10)).unwrap();

    assert_eq!(page.total, 25);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].title, "Title 21");
}

/// Page size 0 uses the default; oversized requests are capped.
#[test]
fn test_page_size_clamping() {
    let (_dir, inventory) = create_inventory();
    for serial in 1..=205 {
        inventory
            .create(make_book(serial, &format!("T{:03}", serial), "Fiction", 100))
            .unwrap();
    }

    let page = inventory.list(&ListQuery::new().page(1, 0)).unwrap();
    assert_eq!(page.items.len(), 20);

    let page = inventory.list(&ListQuery::new().page(1, 500)).unwrap();
    assert_eq!(page.items.len(), 200);
    assert_eq!(page.total, 205);

    let page = inventory.list(&ListQuery::new().page(-3, 10)).unwrap();
    assert_eq!(page.items[0].title, "T001", "page below 1 reads as page 1");
}

/// The configured default page size applies when none is requested.
#[test]
fn test_configured_default_page_size() {
    let (_dir, inventory) = create_inventory();
    let inventory = inventory.with_default_page_size(5);
    for serial in 1..=8 {
        inventory.create(make_book(serial, "T", "Fiction", 100)).unwrap();
    }

    assert_eq!(inventory.list(&ListQuery::new()).unwrap().items.len(), 5);
}

/// Price descending, then search and category filters.
#[test]
fn test_sort_and_filter() {
    let (_dir, inventory) = create_inventory();
    inventory
        .create(make_book(1, "Rust in Action", "Programming", 999).with_authors(["Tim McNamara"]))
        .unwrap();
    inventory.create(make_book(2, "Dune", "Fiction", 450)).unwrap();
    inventory
        .create(make_book(3, "Programming Rust", "programming", 1900))
        .unwrap();

    let by_price = inventory
        .list(&ListQuery::new().sort_by("price").order("DESC"))
        .unwrap();
    assert_eq!(isbns(&by_price.items), vec![isbn(3), isbn(1), isbn(2)]);

    let search = inventory.list(&ListQuery::new().search("  rust ")).unwrap();
    assert_eq!(search.total, 2);

    let author = inventory.list(&ListQuery::new().search("mcnamara")).unwrap();
    assert_eq!(isbns(&author.items), vec![isbn(1)]);

    let category = inventory
        .list(&ListQuery::new().category("PROGRAMMING").sort_by("isbn"))
        .unwrap();
    assert_eq!(isbns(&category.items), vec![isbn(1), isbn(3)]);
}

/// An unknown sort key falls back to title order.
#[test]
fn test_unknown_sort_key_sorts_by_title() {
    let (_dir, inventory) = create_inventory();
    inventory.create(make_book(1, "b", "C", 100)).unwrap();
    inventory.create(make_book(2, "a", "C", 100)).unwrap();

    let page = inventory.list(&ListQuery::new().sort_by("publisher")).unwrap();
    assert_eq!(isbns(&page.items), vec![isbn(2), isbn(1)]);
}

/// Categories are distinct ignoring case and sorted ignoring case.
#[test]
fn test_categories() {
    let (_dir, inventory) = create_inventory();
    inventory.create(make_book(1, "T", "science", 100)).unwrap();
    inventory.create(make_book(2, "T", "Fiction", 100)).unwrap();
    inventory.create(make_book(3, "T", "Science", 100)).unwrap();

    assert_eq!(
        inventory.categories().unwrap(),
        vec!["Fiction".to_string(), "science".to_string()]
    );
}

// =============================================================================
// Change token
// =============================================================================

/// A matching token yields NotModified; any commit invalidates it.
#[test]
fn test_list_if_changed() {
    let (_dir, inventory) = create_inventory();
    inventory.create(make_book(1, "Dune", "Fiction", 999)).unwrap();
    let query = ListQuery::new();

    let token = match inventory.list_if_changed(None, &query).unwrap() {
        ListOutcome::Changed { token, page } => {
            assert_eq!(page.total, 1);
            token
        }
        ListOutcome::NotModified => panic!("no token given, expected a page"),
    };
    assert_eq!(token, inventory.fingerprint().unwrap());

    assert_eq!(
        inventory.list_if_changed(Some(&token), &query).unwrap(),
        ListOutcome::NotModified
    );
    let strong = token.trim_start_matches("W/");
    assert_eq!(
        inventory.list_if_changed(Some(strong), &query).unwrap(),
        ListOutcome::NotModified,
        "weak comparison ignores the W/ prefix"
    );

    inventory.delete(&isbn(1)).unwrap();
    match inventory.list_if_changed(Some(&token), &query).unwrap() {
        ListOutcome::Changed { token: fresh, page } => {
            assert_ne!(fresh, token);
            assert_eq!(page.total, 0);
        }
        ListOutcome::NotModified => panic!("token should be stale after delete"),
    }
}

/// The fingerprint is stable across reads and reopen.
#[test]
fn test_fingerprint_stable_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bookstore.json");

    let token = {
        let inventory = Inventory::new(DocumentStore::open(&path).unwrap());
        inventory.create(make_book(1, "Dune", "Fiction", 999)).unwrap();
        inventory.list(&ListQuery::new()).unwrap();
        inventory.fingerprint().unwrap()
    };

    let inventory = Inventory::new(DocumentStore::open(&path).unwrap());
    assert_eq!(inventory.fingerprint().unwrap(), token);
}
