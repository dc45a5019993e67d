//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BookId`] - Validated book identifier (doubles as the storage key)
//! - [`MilestoneId`] - Positive milestone identifier, unique within a book
//! - [`Fingerprint`] - Document content hash for conflict detection
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use chronicle::core::types::{BookId, MilestoneId};
//!
//! // Valid constructions
//! let book = BookId::new("voyage-of-the-beagle").unwrap();
//! let id = MilestoneId::new(3).unwrap();
//!
//! // Invalid constructions fail at creation time
//! assert!(BookId::new("has/slash").is_err());
//! assert!(MilestoneId::new(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid book id: {0}")]
    InvalidBookId(String),

    #[error("invalid milestone id: {0}")]
    InvalidMilestoneId(String),
}

/// A validated book identifier.
///
/// The id is also the storage key: the book persists at `<library>/<id>.json`.
/// To keep that mapping unambiguous and portable across filesystems, ids:
/// - Cannot be empty, `.`, or `..`
/// - Cannot contain `/` or `\` (no path traversal)
/// - Cannot start with `.` (would hide the document)
/// - Cannot end with `.json` (would double the storage extension)
/// - Cannot contain spaces, `:`, `*`, `?`, `"`, `<`, `>`, `|`, or
///   ASCII control characters
///
/// # Example
///
/// ```
/// use chronicle::core::types::BookId;
///
/// let id = BookId::new("voyage-of-the-beagle").unwrap();
/// assert_eq!(id.as_str(), "voyage-of-the-beagle");
///
/// assert!(BookId::new("").is_err());
/// assert!(BookId::new("../escape").is_err());
/// assert!(BookId::new(".hidden").is_err());
/// assert!(BookId::new("already.json").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookId(String);

impl BookId {
    /// Create a new validated book id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBookId` if the id cannot name a document.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Validate a book id against the storage-key rules.
    fn validate(id: &str) -> Result<(), TypeError> {
        if id.is_empty() {
            return Err(TypeError::InvalidBookId("book id cannot be empty".into()));
        }

        if id == "." || id == ".." {
            return Err(TypeError::InvalidBookId(format!(
                "book id cannot be '{id}' (reserved)"
            )));
        }

        if id.starts_with('.') {
            return Err(TypeError::InvalidBookId(
                "book id cannot start with '.'".into(),
            ));
        }

        if id.ends_with(".json") {
            return Err(TypeError::InvalidBookId(
                "book id cannot end with '.json'".into(),
            ));
        }

        const INVALID_CHARS: [char; 10] = ['/', '\\', ' ', ':', '*', '?', '"', '<', '>', '|'];
        for c in INVALID_CHARS {
            if id.contains(c) {
                return Err(TypeError::InvalidBookId(format!(
                    "book id cannot contain '{c}'"
                )));
            }
        }

        for c in id.chars() {
            if c.is_ascii_control() {
                return Err(TypeError::InvalidBookId(
                    "book id cannot contain control characters".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the book id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BookId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BookId> for String {
    fn from(id: BookId) -> Self {
        id.0
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A milestone identifier.
///
/// Ids are positive integers, unique within one book, assigned once by the
/// book's id counter and never reused or changed afterwards.
///
/// # Example
///
/// ```
/// use chronicle::core::types::MilestoneId;
///
/// let id = MilestoneId::new(7).unwrap();
/// assert_eq!(id.get(), 7);
///
/// // Zero is not a valid id (it marks "absent" at the request boundary)
/// assert!(MilestoneId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MilestoneId(u32);

impl MilestoneId {
    /// Create a new validated milestone id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidMilestoneId` if the value is zero.
    pub fn new(id: u32) -> Result<Self, TypeError> {
        if id == 0 {
            return Err(TypeError::InvalidMilestoneId(
                "milestone id must be positive".into(),
            ));
        }
        Ok(Self(id))
    }

    /// Get the raw id value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for MilestoneId {
    type Error = TypeError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<MilestoneId> for u32 {
    fn from(id: MilestoneId) -> Self {
        id.0
    }
}

impl std::fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A content fingerprint of a persisted document.
///
/// Computed over the exact on-disk bytes, so any concurrent rewrite of the
/// document changes the fingerprint. Used by the store's guarded save to
/// reject lost updates.
///
/// # Example
///
/// ```
/// use chronicle::core::types::Fingerprint;
///
/// let a = Fingerprint::of_bytes(b"{}");
/// let b = Fingerprint::of_bytes(b"{}");
/// assert_eq!(a, b);
///
/// let c = Fingerprint::of_bytes(b"{ }");
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a byte sequence.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
