//! store::paths
//!
//! Centralized path routing for library storage locations.
//!
//! # Architecture
//!
//! Every location inside a library is computed here. No code outside this
//! module may join book file names onto the library root; routing through
//! one helper keeps the id → document mapping consistent everywhere (store,
//! lock, listing).
//!
//! # Storage Layout
//!
//! All data lives under the library root:
//! - `<id>.json` - One document per book
//! - `.locks/<id>.lock` - Per-book advisory lock files
//!
//! # Example
//!
//! ```
//! use chronicle::core::types::BookId;
//! use chronicle::store::paths::LibraryPaths;
//! use std::path::PathBuf;
//!
//! let paths = LibraryPaths::new(PathBuf::from("/srv/books"));
//! let id = BookId::new("travels").unwrap();
//!
//! assert_eq!(paths.book_path(&id), PathBuf::from("/srv/books/travels.json"));
//! assert_eq!(
//!     paths.lock_path(&id),
//!     PathBuf::from("/srv/books/.locks/travels.lock")
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::core::types::BookId;

/// File extension for persisted book documents.
pub const BOOK_EXTENSION: &str = "json";

/// Centralized path routing for a book library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPaths {
    /// The library root: the directory holding one document per book.
    root: PathBuf,
}

impl LibraryPaths {
    /// Create path routing for the given library root.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The library root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The document location for a book.
    ///
    /// This is `<root>/<id>.json`, derived deterministically from the id.
    pub fn book_path(&self, id: &BookId) -> PathBuf {
        self.root.join(format!("{}.{}", id, BOOK_EXTENSION))
    }

    /// The directory holding per-book lock files.
    pub fn locks_dir(&self) -> PathBuf {
        self.root.join(".locks")
    }

    /// The lock file location for a book.
    ///
    /// This is `<root>/.locks/<id>.lock`.
    pub fn lock_path(&self, id: &BookId) -> PathBuf {
        self.locks_dir().join(format!("{}.lock", id))
    }

    /// Ensure the library directory structure exists.
    ///
    /// Creates the root and `.locks/` directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an IO error if directory creation fails.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.locks_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> LibraryPaths {
        LibraryPaths::new(PathBuf::from("/srv/books"))
    }

    fn id(s: &str) -> BookId {
        BookId::new(s).unwrap()
    }

    #[test]
    fn book_path_appends_json_extension() {
        assert_eq!(
            paths().book_path(&id("travels")),
            PathBuf::from("/srv/books/travels.json")
        );
    }

    #[test]
    fn lock_path_lives_under_locks_dir() {
        assert_eq!(
            paths().lock_path(&id("travels")),
            PathBuf::from("/srv/books/.locks/travels.lock")
        );
    }

    #[test]
    fn locks_dir_is_hidden_inside_root() {
        assert_eq!(paths().locks_dir(), PathBuf::from("/srv/books/.locks"));
    }

    #[test]
    fn ensure_dirs_creates_layout() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("library");
        let paths = LibraryPaths::new(root.clone());

        assert!(!root.exists());
        paths.ensure_dirs().unwrap();
        assert!(root.is_dir());
        assert!(root.join(".locks").is_dir());
    }

    #[test]
    fn root_accessor() {
        assert_eq!(paths().root(), Path::new("/srv/books"));
    }
}
