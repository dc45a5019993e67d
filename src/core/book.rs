//! core::book
//!
//! The persisted book schema.
//!
//! # Document Shape
//!
//! One JSON document per book, with stable PascalCase field names:
//!
//! ```json
//! {
//!   "FileName": "voyage-of-the-beagle",
//!   "Title": "The Voyage of the Beagle",
//!   "ImageUrl": "/assets/beagle.jpg",
//!   "Authors": ["Charles Darwin"],
//!   "Milestones": [
//!     { "Id": 1, "Order": 1, "Header": "Devonport", "Caption": "",
//!       "ImageUrl": "", "Body": "..." }
//!   ],
//!   "NextMilestoneId": 2
//! }
//! ```
//!
//! # Ordering
//!
//! `Milestones` is stored in insertion sequence; display position is governed
//! solely by each milestone's `Order` value, ascending, with a stable sort so
//! equal orders keep their stored sequence.
//!
//! # Id Counter
//!
//! `NextMilestoneId` is the book-owned monotonic counter that hands out
//! milestone ids. Documents written before the counter existed (or edited by
//! hand) are normalized on parse: a counter at or below the highest existing
//! id snaps to `highest + 1`, so a fresh id is never reused.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::core::types::{BookId, MilestoneId};

/// Errors from encoding or decoding book documents.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is not a valid book.
    #[error("failed to parse book document: {0}")]
    Parse(String),

    /// The book could not be serialized.
    #[error("failed to encode book document: {0}")]
    Encode(String),
}

/// One narrative entry within a book.
///
/// `id` and `order` are assigned by the ordering engine and never change
/// afterwards; the four text fields are the editable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Milestone {
    /// Unique within the book, assigned once, never reused.
    pub id: MilestoneId,
    /// Display sort key. Not required to be contiguous.
    pub order: i64,
    pub header: String,
    pub caption: String,
    pub image_url: String,
    pub body: String,
}

/// The top-level aggregate: book metadata plus its milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    /// Identifier and storage key. Immutable once created.
    pub file_name: BookId,
    pub title: String,
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub milestones: Vec<Milestone>,
    /// Monotonic id counter. Zero in legacy documents; normalized on parse.
    #[serde(default)]
    pub next_milestone_id: u32,
}

/// Accept `null` where a sequence is expected.
///
/// Documents produced by earlier tooling serialize empty sequences as JSON
/// `null`; those must load as empty rather than fail.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

impl Book {
    /// Create an empty book for the given id.
    ///
    /// This is both "brand-new book" and the soft-miss fallback for loading
    /// an absent document; the two are indistinguishable by design.
    pub fn new(file_name: BookId) -> Self {
        Self {
            file_name,
            title: String::new(),
            image_url: String::new(),
            authors: Vec::new(),
            milestones: Vec::new(),
            next_milestone_id: 1,
        }
    }

    /// Snap the id counter above every existing milestone id.
    ///
    /// Idempotent: a counter already above the highest id is left alone.
    pub fn normalize_counter(&mut self) {
        let highest = self
            .milestones
            .iter()
            .map(|m| m.id.get())
            .max()
            .unwrap_or(0);
        self.next_milestone_id = self.next_milestone_id.max(highest + 1);
    }

    /// Hand out a fresh milestone id and advance the counter.
    pub fn allocate_milestone_id(&mut self) -> MilestoneId {
        self.normalize_counter();
        let id = MilestoneId::new(self.next_milestone_id)
            .expect("normalized counter is always positive");
        self.next_milestone_id += 1;
        id
    }

    /// Find a milestone by id.
    pub fn find_milestone(&self, id: MilestoneId) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Find a milestone by id, mutably.
    pub fn find_milestone_mut(&mut self, id: MilestoneId) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|m| m.id == id)
    }

    /// The highest `Order` currently in the book, or zero when empty.
    ///
    /// This is the append pivot: a new milestone placed after it sorts after
    /// every current entry.
    pub fn max_order(&self) -> i64 {
        self.milestones.iter().map(|m| m.order).max().unwrap_or(0)
    }

    /// Milestones in display order: `Order` ascending, stable.
    pub fn ordered(&self) -> Vec<&Milestone> {
        let mut view: Vec<&Milestone> = self.milestones.iter().collect();
        view.sort_by_key(|m| m.order);
        view
    }

    /// Rearrange the stored sequence into display order (stable).
    ///
    /// Idempotent: sorting an already-sorted book changes nothing.
    pub fn sort_for_display(&mut self) {
        self.milestones.sort_by_key(|m| m.order);
    }
}

/// Parse a book document, normalizing the id counter.
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] for malformed JSON or field values that
/// fail validation (e.g. an invalid `FileName` or a zero milestone id).
pub fn parse_book(json: &str) -> Result<Book, SchemaError> {
    let mut book: Book =
        serde_json::from_str(json).map_err(|e| SchemaError::Parse(e.to_string()))?;
    book.normalize_counter();
    Ok(book)
}

impl Book {
    /// Serialize to the canonical on-disk form.
    ///
    /// Pretty-printed with a fixed field order and a trailing newline, so
    /// re-encoding an unchanged book is byte-for-byte stable.
    pub fn to_canonical_json(&self) -> Result<String, SchemaError> {
        let mut json =
            serde_json::to_string_pretty(self).map_err(|e| SchemaError::Encode(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_id(s: &str) -> BookId {
        BookId::new(s).unwrap()
    }

    fn milestone(id: u32, order: i64) -> Milestone {
        Milestone {
            id: MilestoneId::new(id).unwrap(),
            order,
            header: format!("header {id}"),
            caption: String::new(),
            image_url: String::new(),
            body: String::new(),
        }
    }

    #[test]
    fn new_book_is_empty_with_counter_at_one() {
        let book = Book::new(book_id("travels"));
        assert!(book.milestones.is_empty());
        assert!(book.authors.is_empty());
        assert_eq!(book.next_milestone_id, 1);
    }

    #[test]
    fn allocate_hands_out_sequential_ids() {
        let mut book = Book::new(book_id("travels"));
        assert_eq!(book.allocate_milestone_id().get(), 1);
        assert_eq!(book.allocate_milestone_id().get(), 2);
        assert_eq!(book.allocate_milestone_id().get(), 3);
    }

    #[test]
    fn counter_normalizes_above_existing_ids() {
        let mut book = Book::new(book_id("travels"));
        book.milestones.push(milestone(5, 1));
        book.next_milestone_id = 0; // legacy document
        assert_eq!(book.allocate_milestone_id().get(), 6);
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut book = Book::new(book_id("travels"));
        book.milestones.push(milestone(2, 1));
        book.next_milestone_id = 9;
        book.normalize_counter();
        assert_eq!(book.next_milestone_id, 9);
        book.normalize_counter();
        assert_eq!(book.next_milestone_id, 9);
    }

    #[test]
    fn ordered_sorts_by_order_ascending() {
        let mut book = Book::new(book_id("travels"));
        book.milestones.push(milestone(1, 3));
        book.milestones.push(milestone(2, 1));
        book.milestones.push(milestone(3, 2));

        let ids: Vec<u32> = book.ordered().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn ordered_is_stable_for_equal_orders() {
        let mut book = Book::new(book_id("travels"));
        book.milestones.push(milestone(1, 2));
        book.milestones.push(milestone(2, 2));
        book.milestones.push(milestone(3, 1));

        // Ties keep stored sequence: 3 first, then 1 before 2.
        let ids: Vec<u32> = book.ordered().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn sort_for_display_is_idempotent() {
        let mut book = Book::new(book_id("travels"));
        book.milestones.push(milestone(1, 2));
        book.milestones.push(milestone(2, 2));
        book.milestones.push(milestone(3, 1));

        book.sort_for_display();
        let once = book.milestones.clone();
        book.sort_for_display();
        assert_eq!(book.milestones, once);
    }

    #[test]
    fn max_order_of_empty_book_is_zero() {
        let book = Book::new(book_id("travels"));
        assert_eq!(book.max_order(), 0);
    }

    #[test]
    fn wire_names_are_pascal_case() {
        let mut book = Book::new(book_id("travels"));
        book.title = "Travels".into();
        book.milestones.push(milestone(1, 1));

        let json = book.to_canonical_json().unwrap();
        for field in [
            "\"FileName\"",
            "\"Title\"",
            "\"ImageUrl\"",
            "\"Authors\"",
            "\"Milestones\"",
            "\"NextMilestoneId\"",
            "\"Id\"",
            "\"Order\"",
            "\"Header\"",
            "\"Caption\"",
            "\"Body\"",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
    }

    #[test]
    fn canonical_json_roundtrip_is_stable() {
        let mut book = Book::new(book_id("travels"));
        book.title = "Travels".into();
        book.authors = vec!["A. Author".into(), "B. Author".into()];
        book.milestones.push(milestone(1, 1));
        book.milestones.push(milestone(2, 2));
        book.next_milestone_id = 3;

        let first = book.to_canonical_json().unwrap();
        let reparsed = parse_book(&first).unwrap();
        let second = reparsed.to_canonical_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parse_accepts_null_sequences() {
        let json = r#"{
            "FileName": "travels",
            "Title": "",
            "ImageUrl": "",
            "Authors": null,
            "Milestones": null
        }"#;
        let book = parse_book(json).unwrap();
        assert!(book.authors.is_empty());
        assert!(book.milestones.is_empty());
        assert_eq!(book.next_milestone_id, 1);
    }

    #[test]
    fn parse_normalizes_missing_counter() {
        let json = r#"{
            "FileName": "travels",
            "Title": "",
            "ImageUrl": "",
            "Authors": [],
            "Milestones": [
                { "Id": 1, "Order": 1, "Header": "a", "Caption": "",
                  "ImageUrl": "", "Body": "" },
                { "Id": 4, "Order": 2, "Header": "b", "Caption": "",
                  "ImageUrl": "", "Body": "" }
            ]
        }"#;
        let book = parse_book(json).unwrap();
        assert_eq!(book.next_milestone_id, 5);
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(matches!(parse_book("not json"), Err(SchemaError::Parse(_))));
    }

    #[test]
    fn parse_rejects_invalid_file_name() {
        let json = r#"{ "FileName": "a/b", "Title": "", "ImageUrl": "" }"#;
        assert!(parse_book(json).is_err());
    }

    #[test]
    fn parse_rejects_zero_milestone_id() {
        let json = r#"{
            "FileName": "travels",
            "Title": "",
            "ImageUrl": "",
            "Milestones": [
                { "Id": 0, "Order": 1, "Header": "", "Caption": "",
                  "ImageUrl": "", "Body": "" }
            ]
        }"#;
        assert!(parse_book(json).is_err());
    }
}
