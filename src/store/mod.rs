//! store
//!
//! The Book Store: whole-document persistence for books.
//!
//! # Architecture
//!
//! Each book is one JSON document at a location derived deterministically
//! from its id (see [`paths::LibraryPaths`]). The store performs
//! whole-document load and save; there is no partial update. Saving fully
//! replaces the prior document.
//!
//! # Load Contract
//!
//! [`BookStore::load`] distinguishes "absent" (`Ok(None)`) from "present"
//! and from "unreadable". Callers that want the classic soft-miss behavior
//! (an absent book reads as a brand-new empty book) use
//! [`BookStore::load_or_new`]. Malformed documents are surfaced as
//! [`StoreError::ParseFailed`] in both cases, so corruption is never
//! mistaken for an empty book.
//!
//! # Conflict Detection
//!
//! Every successful load carries a [`Fingerprint`] of the on-disk bytes.
//! [`BookStore::save_guarded`] rejects the write when the fingerprint no
//! longer matches, which turns a silent lost update into an explicit
//! [`StoreError::Conflict`]. The check and the write are not atomic on
//! their own; hold the book's [`lock::BookLock`] across load and save to
//! make the guard exact.

pub mod lock;
pub mod paths;

pub use lock::{BookLock, LockError};
pub use paths::LibraryPaths;

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::book::{parse_book, Book, SchemaError};
use crate::core::types::{BookId, Fingerprint};

/// Errors from book storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document exists but could not be read.
    #[error("failed to read book document '{path}': {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The document could not be written.
    #[error("failed to write book document '{path}': {source}")]
    WriteFailed { path: PathBuf, source: io::Error },

    /// The document exists but is not a valid book.
    #[error("malformed book document '{path}': {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// The book could not be serialized.
    #[error("failed to encode book '{id}': {message}")]
    EncodeFailed { id: BookId, message: String },

    /// The on-disk document is not in the state the caller loaded.
    #[error("conflicting write to book '{id}': the document changed since it was loaded")]
    Conflict {
        id: BookId,
        expected: Option<Fingerprint>,
        found: Option<Fingerprint>,
    },

    /// The library directory could not be enumerated.
    #[error("failed to list library '{path}': {source}")]
    ListFailed { path: PathBuf, source: io::Error },
}

/// Result of loading a book.
///
/// Carries the content fingerprint of the on-disk bytes; pass it to
/// [`BookStore::save_guarded`] to reject lost updates.
#[derive(Debug, Clone)]
pub struct LoadedBook {
    /// The parsed book, with its id counter normalized.
    pub book: Book,
    /// Fingerprint of the exact bytes the book was parsed from.
    pub fingerprint: Fingerprint,
}

/// Book store backed by one JSON document per book.
///
/// # Example
///
/// ```
/// use chronicle::core::book::Book;
/// use chronicle::core::types::BookId;
/// use chronicle::store::{BookStore, LibraryPaths};
///
/// let temp = tempfile::TempDir::new().unwrap();
/// let store = BookStore::new(LibraryPaths::new(temp.path().to_path_buf()));
///
/// let id = BookId::new("travels").unwrap();
/// assert!(store.load(&id).unwrap().is_none());
///
/// let mut book = Book::new(id.clone());
/// book.title = "Travels".into();
/// store.save(&book).unwrap();
///
/// let loaded = store.load(&id).unwrap().unwrap();
/// assert_eq!(loaded.book.title, "Travels");
/// ```
#[derive(Debug, Clone)]
pub struct BookStore {
    paths: LibraryPaths,
}

impl BookStore {
    /// Create a store over the given library paths.
    pub fn new(paths: LibraryPaths) -> Self {
        Self { paths }
    }

    /// Create a store rooted at a directory.
    pub fn at(root: PathBuf) -> Self {
        Self::new(LibraryPaths::new(root))
    }

    /// The store's path routing.
    pub fn paths(&self) -> &LibraryPaths {
        &self.paths
    }

    /// Load a book by id.
    ///
    /// Returns `Ok(None)` when no document exists for the id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ReadFailed`] if the document exists but is unreadable
    /// - [`StoreError::ParseFailed`] if the document is not a valid book
    pub fn load(&self, id: &BookId) -> Result<Option<LoadedBook>, StoreError> {
        let path = self.paths.book_path(id);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::ReadFailed { path, source }),
        };

        let fingerprint = Fingerprint::of_bytes(&bytes);

        let text = String::from_utf8(bytes).map_err(|e| StoreError::ParseFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let book = parse_book(&text).map_err(|e| match e {
            SchemaError::Parse(message) | SchemaError::Encode(message) => StoreError::ParseFailed {
                path: path.clone(),
                message,
            },
        })?;

        Ok(Some(LoadedBook { book, fingerprint }))
    }

    /// Load a book, treating an absent document as a new empty book.
    ///
    /// This is the soft-miss read the ordering engine builds on: inserting
    /// the first milestone into a book nobody has saved yet just works. The
    /// returned fingerprint is `None` exactly when the document was absent.
    ///
    /// # Errors
    ///
    /// Read and parse failures still surface; only absence is soft.
    pub fn load_or_new(&self, id: &BookId) -> Result<(Book, Option<Fingerprint>), StoreError> {
        match self.load(id)? {
            Some(loaded) => Ok((loaded.book, Some(loaded.fingerprint))),
            None => Ok((Book::new(id.clone()), None)),
        }
    }

    /// Save a book, replacing any prior document.
    ///
    /// The write is atomic: the document is staged next to its final
    /// location and renamed into place, so a crash never leaves a
    /// half-written book behind.
    ///
    /// # Errors
    ///
    /// - [`StoreError::EncodeFailed`] if the book cannot be serialized
    /// - [`StoreError::WriteFailed`] for filesystem failures
    pub fn save(&self, book: &Book) -> Result<Fingerprint, StoreError> {
        self.paths
            .ensure_dirs()
            .map_err(|source| StoreError::WriteFailed {
                path: self.paths.root().to_path_buf(),
                source,
            })?;

        let json = book
            .to_canonical_json()
            .map_err(|e| StoreError::EncodeFailed {
                id: book.file_name.clone(),
                message: e.to_string(),
            })?;

        let path = self.paths.book_path(&book.file_name);
        let staged = path.with_extension("json.tmp");

        fs::write(&staged, json.as_bytes()).map_err(|source| StoreError::WriteFailed {
            path: staged.clone(),
            source,
        })?;
        fs::rename(&staged, &path).map_err(|source| StoreError::WriteFailed { path, source })?;

        Ok(Fingerprint::of_bytes(json.as_bytes()))
    }

    /// Save a book only if the on-disk document is still in the loaded state.
    ///
    /// Pass the fingerprint from [`BookStore::load`] (or `None` when the
    /// document was absent at load time). A mismatch means another writer
    /// got there first; the save is rejected with [`StoreError::Conflict`]
    /// and the document is left untouched.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Conflict`] if the document changed since load
    /// - Everything [`BookStore::save`] can return
    pub fn save_guarded(
        &self,
        book: &Book,
        expected: Option<&Fingerprint>,
    ) -> Result<Fingerprint, StoreError> {
        let path = self.paths.book_path(&book.file_name);

        let found = match fs::read(&path) {
            Ok(bytes) => Some(Fingerprint::of_bytes(&bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(StoreError::ReadFailed { path, source }),
        };

        if found.as_ref() != expected {
            return Err(StoreError::Conflict {
                id: book.file_name.clone(),
                expected: expected.cloned(),
                found,
            });
        }

        self.save(book)
    }

    /// List the ids of every book in the library, sorted.
    ///
    /// A missing library directory is an empty library. Directory entries
    /// that are not book documents (wrong extension, invalid id) are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ListFailed`] if the directory exists but
    /// cannot be enumerated.
    pub fn list(&self) -> Result<Vec<BookId>, StoreError> {
        let root = self.paths.root();

        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::ListFailed {
                    path: root.to_path_buf(),
                    source,
                })
            }
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::ListFailed {
                path: root.to_path_buf(),
                source,
            })?;
            let path = entry.path();

            if path.extension().and_then(|e| e.to_str()) != Some(paths::BOOK_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(id) = BookId::new(stem) {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Check whether a document exists for the id.
    pub fn exists(&self, id: &BookId) -> bool {
        self.paths.book_path(id).exists()
    }
}
