//! store::lock
//!
//! Exclusive per-book lock for load-compute-save cycles.
//!
//! # Architecture
//!
//! Two overlapping requests against the same book would race: both load,
//! both compute, the later save silently discards the earlier one. The book
//! lock closes that window by making the whole cycle mutually exclusive per
//! book id. Different books never contend.
//!
//! # Storage
//!
//! - `<root>/.locks/<id>.lock` - Lock file with an OS-level exclusive lock
//!
//! # Invariants
//!
//! - The lock must be held for the entire load-compute-save span
//! - The lock is released on drop (RAII)
//! - Acquisition is non-blocking (fails fast if locked)
//!
//! # Example
//!
//! ```ignore
//! use chronicle::store::lock::BookLock;
//! use chronicle::store::paths::LibraryPaths;
//!
//! let lock = BookLock::acquire(&paths, &id)?;
//!
//! // load, compute, save while holding the lock
//!
//! drop(lock);
//! ```

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::core::types::BookId;
use crate::store::paths::LibraryPaths;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock for this book.
    #[error("book '{0}' is locked by another chronicle process")]
    AlreadyLocked(BookId),

    /// Failed to create the lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),

    /// Failed to release the lock.
    #[error("failed to release lock: {0}")]
    ReleaseFailed(String),
}

/// An exclusive lock on one book.
///
/// Released automatically when dropped, so the lock cannot outlive the
/// request even if the operation panics.
#[derive(Debug)]
pub struct BookLock {
    /// Path to the lock file.
    path: PathBuf,
    /// The open file handle with the lock held.
    /// When this is Some, we hold the lock.
    file: Option<File>,
}

impl BookLock {
    /// Attempt to acquire the lock for a book.
    ///
    /// Uses OS-level file locking via `fs2`, which works across processes.
    /// Non-blocking: if another process holds the lock, this returns
    /// [`LockError::AlreadyLocked`] immediately.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(paths: &LibraryPaths, id: &BookId) -> Result<Self, LockError> {
        let locks_dir = paths.locks_dir();
        std::fs::create_dir_all(&locks_dir).map_err(|e| {
            LockError::CreateFailed(format!("cannot create {}: {}", locks_dir.display(), e))
        })?;

        let path = paths.lock_path(id);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                file: Some(file),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked(id.clone()))
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock explicitly.
    ///
    /// Called automatically on drop; useful when the lock must end before
    /// the guard goes out of scope.
    pub fn release(&mut self) -> Result<(), LockError> {
        if let Some(file) = self.file.take() {
            file.unlock()
                .map_err(|e| LockError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Drop for BookLock {
    fn drop(&mut self) {
        // Best-effort release on drop - ignore errors since we're dropping
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, LibraryPaths) {
        let temp = TempDir::new().expect("create temp dir");
        let paths = LibraryPaths::new(temp.path().to_path_buf());
        (temp, paths)
    }

    fn id(s: &str) -> BookId {
        BookId::new(s).unwrap()
    }

    #[test]
    fn lock_acquire_succeeds() {
        let (_temp, paths) = test_paths();
        let lock = BookLock::acquire(&paths, &id("travels")).expect("acquire lock");
        assert!(lock.is_held());
        assert!(lock.path().exists());
    }

    #[test]
    fn lock_creates_locks_directory() {
        let (_temp, paths) = test_paths();
        assert!(!paths.locks_dir().exists());

        let _lock = BookLock::acquire(&paths, &id("travels")).expect("acquire lock");
        assert!(paths.locks_dir().exists());
    }

    #[test]
    fn lock_prevents_second_acquire() {
        let (_temp, paths) = test_paths();
        let lock1 = BookLock::acquire(&paths, &id("travels")).expect("first acquire");
        assert!(lock1.is_held());

        let result = BookLock::acquire(&paths, &id("travels"));
        assert!(matches!(result, Err(LockError::AlreadyLocked(_))));
    }

    #[test]
    fn different_books_do_not_contend() {
        let (_temp, paths) = test_paths();
        let _lock1 = BookLock::acquire(&paths, &id("travels")).expect("first book");
        let lock2 = BookLock::acquire(&paths, &id("memoirs")).expect("second book");
        assert!(lock2.is_held());
    }

    #[test]
    fn lock_released_on_drop() {
        let (_temp, paths) = test_paths();
        {
            let lock = BookLock::acquire(&paths, &id("travels")).expect("first acquire");
            assert!(lock.is_held());
            // lock dropped here
        }

        let lock2 = BookLock::acquire(&paths, &id("travels")).expect("second acquire");
        assert!(lock2.is_held());
    }

    #[test]
    fn lock_released_explicitly() {
        let (_temp, paths) = test_paths();
        let mut lock = BookLock::acquire(&paths, &id("travels")).expect("acquire");

        lock.release().expect("release");
        assert!(!lock.is_held());

        let lock2 = BookLock::acquire(&paths, &id("travels")).expect("reacquire");
        assert!(lock2.is_held());
    }

    #[test]
    fn multiple_release_calls_are_safe() {
        let (_temp, paths) = test_paths();
        let mut lock = BookLock::acquire(&paths, &id("travels")).expect("acquire");

        lock.release().expect("first release");
        lock.release().expect("second release should be ok");
        assert!(!lock.is_held());
    }

    #[test]
    fn lock_path_is_correct() {
        let (_temp, paths) = test_paths();
        let lock = BookLock::acquire(&paths, &id("travels")).expect("acquire");
        assert_eq!(lock.path(), paths.lock_path(&id("travels")));
    }

    #[test]
    fn error_display_formatting() {
        let err = LockError::AlreadyLocked(id("travels"));
        assert!(err.to_string().contains("travels"));
        assert!(err.to_string().contains("locked"));

        let err = LockError::CreateFailed("test".into());
        assert!(err.to_string().contains("create"));

        let err = LockError::AcquireFailed("test".into());
        assert!(err.to_string().contains("acquire"));

        let err = LockError::ReleaseFailed("test".into());
        assert!(err.to_string().contains("release"));
    }
}
