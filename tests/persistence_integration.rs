//! Integration tests for the persistence layer.
//!
//! These tests exercise the BookStore and BookLock against real library
//! directories created with tempfile.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use chronicle::core::book::Book;
use chronicle::core::ordering::{insert_after, MilestoneDraft};
use chronicle::core::types::{BookId, MilestoneId};
use chronicle::store::{BookLock, BookStore, LockError, StoreError};

// =============================================================================
// Test Helpers
// =============================================================================

/// A temporary library directory with a store over it.
struct TestLibrary {
    dir: TempDir,
    store: BookStore,
}

impl TestLibrary {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let store = BookStore::at(dir.path().to_path_buf());
        Self { dir, store }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn store(&self) -> &BookStore {
        &self.store
    }

    /// Write raw document bytes for a book id, bypassing the store.
    fn write_raw(&self, id: &str, contents: &str) {
        fs::write(self.path().join(format!("{id}.json")), contents).expect("write raw document");
    }

    fn read_raw(&self, id: &str) -> Vec<u8> {
        fs::read(self.path().join(format!("{id}.json"))).expect("read raw document")
    }
}

fn id(s: &str) -> BookId {
    BookId::new(s).unwrap()
}

/// A book with a few milestones, built through the ordering engine.
fn sample_book(book_id: &str, milestones: usize) -> Book {
    let mut book = Book::new(id(book_id));
    book.title = "A Sample".into();
    book.authors = vec!["Author One".into(), "Author Two".into()];
    for n in 0..milestones {
        insert_after(&mut book, None, MilestoneDraft::with_header(format!("m{n}")));
    }
    book
}

// =============================================================================
// BookStore Tests
// =============================================================================

mod book_store {
    use super::*;

    #[test]
    fn load_absent_returns_none() {
        let lib = TestLibrary::new();
        let result = lib.store().load(&id("nonexistent")).expect("load");
        assert!(result.is_none());
    }

    #[test]
    fn save_load_roundtrip_preserves_everything() {
        let lib = TestLibrary::new();
        let book = sample_book("travels", 3);

        lib.store().save(&book).expect("save");
        let loaded = lib.store().load(&id("travels")).expect("load").expect("exists");

        assert_eq!(loaded.book, book);
    }

    #[test]
    fn repeated_save_load_is_byte_identical() {
        let lib = TestLibrary::new();
        lib.store().save(&sample_book("travels", 3)).expect("save");

        let first = lib.store().load(&id("travels")).expect("load").expect("exists");
        lib.store().save(&first.book).expect("resave");
        let bytes_one = lib.read_raw("travels");

        let second = lib.store().load(&id("travels")).expect("load").expect("exists");
        lib.store().save(&second.book).expect("resave");
        let bytes_two = lib.read_raw("travels");

        assert_eq!(bytes_one, bytes_two);
    }

    #[test]
    fn legacy_document_without_counter_loads_and_allocates_safely() {
        let lib = TestLibrary::new();
        // The shape earlier tooling wrote: no counter, null-able sequences.
        lib.write_raw(
            "legacy",
            r#"{
                "FileName": "legacy",
                "Title": "Old Book",
                "ImageUrl": "",
                "Authors": null,
                "Milestones": [
                    { "Id": 1, "Order": 1, "Header": "one", "Caption": "",
                      "ImageUrl": "", "Body": "" },
                    { "Id": 3, "Order": 2, "Header": "three", "Caption": "",
                      "ImageUrl": "", "Body": "" }
                ]
            }"#,
        );

        let loaded = lib.store().load(&id("legacy")).expect("load").expect("exists");
        let mut book = loaded.book;
        assert_eq!(book.next_milestone_id, 4);

        let fresh = book.allocate_milestone_id();
        assert_eq!(fresh, MilestoneId::new(4).unwrap());
    }

    #[test]
    fn corrupt_document_is_a_parse_error_not_an_empty_book() {
        let lib = TestLibrary::new();
        lib.write_raw("corrupt", "{ this is not json");

        let strict = lib.store().load(&id("corrupt"));
        assert!(matches!(strict, Err(StoreError::ParseFailed { .. })));

        let soft = lib.store().load_or_new(&id("corrupt"));
        assert!(matches!(soft, Err(StoreError::ParseFailed { .. })));
    }

    #[test]
    fn load_or_new_treats_absent_as_new_empty_book() {
        let lib = TestLibrary::new();
        let (book, fingerprint) = lib.store().load_or_new(&id("brand-new")).expect("load_or_new");

        assert_eq!(book, Book::new(id("brand-new")));
        assert!(fingerprint.is_none());
    }

    #[test]
    fn guarded_save_rejects_interleaved_writer() {
        let lib = TestLibrary::new();
        let mut book = sample_book("travels", 1);
        let stale = lib.store().save(&book).expect("save");

        // A second writer slips in.
        book.title = "Theirs".into();
        lib.store().save(&book).expect("interleaved save");

        book.title = "Ours".into();
        let result = lib.store().save_guarded(&book, Some(&stale));
        assert!(matches!(result, Err(StoreError::Conflict { .. })));

        let surviving = lib.store().load(&id("travels")).expect("load").expect("exists");
        assert_eq!(surviving.book.title, "Theirs");
    }

    #[test]
    fn guarded_save_accepts_current_fingerprint() {
        let lib = TestLibrary::new();
        let mut book = sample_book("travels", 1);
        let current = lib.store().save(&book).expect("save");

        book.title = "Revised".into();
        lib.store()
            .save_guarded(&book, Some(&current))
            .expect("guarded save with fresh fingerprint");
    }

    #[test]
    fn list_enumerates_only_books() {
        let lib = TestLibrary::new();
        lib.store().save(&sample_book("zebra", 0)).expect("save");
        lib.store().save(&sample_book("aardvark", 2)).expect("save");
        fs::write(lib.path().join("README.txt"), "hello").unwrap();

        let ids = lib.store().list().expect("list");
        assert_eq!(ids, vec![id("aardvark"), id("zebra")]);
    }

    #[test]
    fn list_missing_library_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = BookStore::at(temp.path().join("never-created"));
        assert!(store.list().expect("list").is_empty());
    }
}

// =============================================================================
// BookLock Tests
// =============================================================================

mod book_lock {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let lib = TestLibrary::new();
        let paths = lib.store().paths();

        let held = BookLock::acquire(paths, &id("travels")).expect("first acquire");
        assert!(held.is_held());

        let contender = BookLock::acquire(paths, &id("travels"));
        assert!(matches!(contender, Err(LockError::AlreadyLocked(_))));
    }

    #[test]
    fn lock_scope_is_per_book() {
        let lib = TestLibrary::new();
        let paths = lib.store().paths();

        let _held = BookLock::acquire(paths, &id("travels")).expect("acquire travels");
        let other = BookLock::acquire(paths, &id("memoirs")).expect("acquire memoirs");
        assert!(other.is_held());
    }

    #[test]
    fn dropping_the_lock_releases_it() {
        let lib = TestLibrary::new();
        let paths = lib.store().paths();

        {
            let _held = BookLock::acquire(paths, &id("travels")).expect("first acquire");
        }
        BookLock::acquire(paths, &id("travels")).expect("reacquire after drop");
    }

    #[test]
    fn lock_files_do_not_pollute_the_listing() {
        let lib = TestLibrary::new();
        let _held = BookLock::acquire(lib.store().paths(), &id("travels")).expect("acquire");

        // Only real book documents appear.
        assert!(lib.store().list().expect("list").is_empty());
    }
}
