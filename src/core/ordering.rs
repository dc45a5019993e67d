//! core::ordering
//!
//! The milestone ordering engine.
//!
//! # Overview
//!
//! Given a loaded book and one change request, produce a consistent milestone
//! list. Two paths:
//!
//! - **Edit in place**: overwrite the text fields of an existing milestone,
//!   leaving `Id` and `Order` untouched.
//! - **Insert after**: add a new milestone immediately after a reference
//!   milestone (or at the end when no reference is given), shifting later
//!   entries to make room.
//!
//! # Insertion
//!
//! 1. A fresh id comes from the book's monotonic counter.
//! 2. The *pivot order* is the reference milestone's `Order`; with no
//!    reference, or a reference that no longer exists, it is the highest
//!    current order (append).
//! 3. Every milestone with `Order` strictly greater than the pivot is shifted
//!    up by one.
//! 4. The new milestone gets `Order = pivot + 1` and is appended to the
//!    stored sequence. Sequence position is irrelevant; display order is
//!    governed solely by `Order`.
//!
//! For the lists this engine produces, orders are always exactly
//! `1..=len`, so the shift keeps them gap-free without a full renumber.
//!
//! # Invariants
//!
//! - Ids are never reused or changed.
//! - An edit never reorders siblings.
//! - Every "not found" condition resolves to an explicit [`ApplyOutcome`] /
//!   [`PivotResolution`] variant; callers decide whether to warn.
//!
//! # Example
//!
//! ```
//! use chronicle::core::book::Book;
//! use chronicle::core::ordering::{apply, MilestoneChange, MilestoneDraft};
//! use chronicle::core::types::BookId;
//!
//! let mut book = Book::new(BookId::new("travels").unwrap());
//! let outcome = apply(
//!     &mut book,
//!     MilestoneChange::Insert { after: None },
//!     MilestoneDraft::with_header("Setting out"),
//! );
//! assert!(outcome.changed_book());
//! assert_eq!(book.ordered()[0].header, "Setting out");
//! ```

use crate::core::book::{Book, Milestone};
use crate::core::types::MilestoneId;

/// The editable content of a milestone: everything except `Id` and `Order`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneDraft {
    pub header: String,
    pub caption: String,
    pub image_url: String,
    pub body: String,
}

impl MilestoneDraft {
    /// A draft with only a header, for terse construction in tests and docs.
    pub fn with_header(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }
}

/// One change request against a book's milestone list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneChange {
    /// Overwrite the text fields of an existing milestone.
    Edit(MilestoneId),
    /// Insert a new milestone after the referenced one (append when `None`).
    Insert { after: Option<MilestoneId> },
}

/// How the insertion pivot was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotResolution {
    /// No reference id was given; the new milestone goes at the end.
    AppendDefault,
    /// The reference milestone was found; the new one lands right after it.
    Reference { id: MilestoneId, order: i64 },
    /// The reference id matched nothing; fell back to append.
    MissingReference { id: MilestoneId },
}

/// What applying a change did to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new milestone was inserted with the given id and order.
    Inserted {
        id: MilestoneId,
        order: i64,
        pivot: PivotResolution,
    },
    /// The target milestone's text fields were overwritten.
    Edited { id: MilestoneId },
    /// The edit target does not exist; the book is unchanged.
    EditTargetMissing { id: MilestoneId },
}

impl ApplyOutcome {
    /// Whether the book was modified and needs to be persisted.
    pub fn changed_book(&self) -> bool {
        !matches!(self, ApplyOutcome::EditTargetMissing { .. })
    }
}

/// Apply one change request to the book's milestone list.
///
/// This is the single entry point for both paths; the presence of an edit
/// target selects between them, mirroring the request shape (an absent
/// `milestoneId` means insertion).
pub fn apply(book: &mut Book, change: MilestoneChange, draft: MilestoneDraft) -> ApplyOutcome {
    match change {
        MilestoneChange::Edit(id) => edit_in_place(book, id, draft),
        MilestoneChange::Insert { after } => insert_after(book, after, draft),
    }
}

/// Overwrite the text fields of the milestone with the given id.
///
/// `Id` and `Order` are preserved and no sibling moves. A missing target
/// leaves the book untouched and reports [`ApplyOutcome::EditTargetMissing`].
pub fn edit_in_place(book: &mut Book, id: MilestoneId, draft: MilestoneDraft) -> ApplyOutcome {
    match book.find_milestone_mut(id) {
        Some(milestone) => {
            milestone.header = draft.header;
            milestone.caption = draft.caption;
            milestone.image_url = draft.image_url;
            milestone.body = draft.body;
            ApplyOutcome::Edited { id }
        }
        None => ApplyOutcome::EditTargetMissing { id },
    }
}

/// Insert a new milestone after the referenced one.
///
/// With `after: None` (or a reference that no longer exists) the new
/// milestone is appended: its order exceeds every current order.
pub fn insert_after(
    book: &mut Book,
    after: Option<MilestoneId>,
    draft: MilestoneDraft,
) -> ApplyOutcome {
    let (pivot, resolution) = resolve_pivot(book, after);

    let id = book.allocate_milestone_id();

    // Make room: everything past the pivot shifts up by one.
    for milestone in &mut book.milestones {
        if milestone.order > pivot {
            milestone.order += 1;
        }
    }

    let order = pivot + 1;
    book.milestones.push(Milestone {
        id,
        order,
        header: draft.header,
        caption: draft.caption,
        image_url: draft.image_url,
        body: draft.body,
    });

    ApplyOutcome::Inserted {
        id,
        order,
        pivot: resolution,
    }
}

/// Determine the pivot order for an insertion.
fn resolve_pivot(book: &Book, after: Option<MilestoneId>) -> (i64, PivotResolution) {
    match after {
        None => (book.max_order(), PivotResolution::AppendDefault),
        Some(id) => match book.find_milestone(id) {
            Some(reference) => (
                reference.order,
                PivotResolution::Reference {
                    id,
                    order: reference.order,
                },
            ),
            None => (book.max_order(), PivotResolution::MissingReference { id }),
        },
    }
}
