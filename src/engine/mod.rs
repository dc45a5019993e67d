//! engine
//!
//! Orchestrates one request: resolve library -> lock -> load -> compute -> save.
//!
//! # Architecture
//!
//! The engine is the only mutation path. Command handlers build a request,
//! call one engine operation, and format its report; they never touch the
//! store directly. Each mutating operation runs under the book's advisory
//! lock and saves with the fingerprint guard, so overlapping requests for
//! the same book fail fast instead of silently losing a write.
//!
//! # Reports
//!
//! Operations return reports carrying warnings instead of printing. The
//! soft-miss policies live here: a missing book reads as empty, a missing
//! edit target is a no-op, a missing insert reference appends - each with a
//! warning the CLI surfaces on stderr.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::book::Book;
use crate::core::config::{Config, ConfigError};
use crate::core::ordering::{self, ApplyOutcome, MilestoneChange, MilestoneDraft, PivotResolution};
use crate::core::types::{BookId, MilestoneId};
use crate::store::{BookLock, BookStore, LockError, StoreError};

/// Execution context derived from global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Library root override (`--library`).
    pub library: Option<PathBuf>,
    /// Verbose diagnostics (`--debug`).
    pub debug: bool,
    /// Minimal output (`--quiet`).
    pub quiet: bool,
}

/// Errors from engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolve the book store for this invocation.
///
/// Applies the library-root precedence: `--library` flag, then
/// `$CHRONICLE_LIBRARY`, then the global config, then `./books`.
pub fn resolve_store(ctx: &Context) -> Result<BookStore, EngineError> {
    let config = Config::load()?;
    let root = config.library_root(ctx.library.as_deref());
    Ok(BookStore::at(root))
}

/// One milestone change request.
///
/// `milestone` present means edit-in-place; absent means insertion, with
/// `after` naming the reference milestone (append when `None`).
#[derive(Debug, Clone)]
pub struct MilestoneRequest {
    pub book: BookId,
    pub milestone: Option<MilestoneId>,
    pub after: Option<MilestoneId>,
    pub draft: MilestoneDraft,
}

/// What a milestone request did.
#[derive(Debug)]
pub struct MilestoneReport {
    pub book: BookId,
    pub outcome: ApplyOutcome,
    pub warnings: Vec<String>,
}

/// Apply a milestone change to a book and persist the result.
///
/// Holds the book's lock for the whole load-compute-save span and saves
/// with the fingerprint guard. A book nobody has saved yet loads as empty,
/// so the first insertion creates the document.
///
/// # Errors
///
/// - [`EngineError::Lock`] if another process is working on the book
/// - [`EngineError::Store`] for read, parse, encode, write, or conflict
///   failures
pub fn save_milestone(
    store: &BookStore,
    request: MilestoneRequest,
) -> Result<MilestoneReport, EngineError> {
    let _lock = BookLock::acquire(store.paths(), &request.book)?;
    let (mut book, fingerprint) = store.load_or_new(&request.book)?;

    let change = match request.milestone {
        Some(id) => MilestoneChange::Edit(id),
        None => MilestoneChange::Insert {
            after: request.after,
        },
    };
    let outcome = ordering::apply(&mut book, change, request.draft);

    let mut warnings = Vec::new();
    match &outcome {
        ApplyOutcome::Inserted {
            pivot: PivotResolution::MissingReference { id },
            ..
        } => warnings.push(format!(
            "milestone {id} not found in '{}'; appending at the end",
            request.book
        )),
        ApplyOutcome::EditTargetMissing { id } => warnings.push(format!(
            "milestone {id} not found in '{}'; nothing to edit",
            request.book
        )),
        _ => {}
    }

    if outcome.changed_book() {
        store.save_guarded(&book, fingerprint.as_ref())?;
    }

    Ok(MilestoneReport {
        book: request.book,
        outcome,
        warnings,
    })
}

/// Book metadata for create-or-update.
///
/// `None` fields are left unchanged on an existing book.
#[derive(Debug, Clone)]
pub struct BookDetails {
    pub id: BookId,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub authors: Option<Vec<String>>,
}

/// What a book upsert did.
#[derive(Debug)]
pub struct BookReport {
    pub book: BookId,
    pub created: bool,
}

/// Create a book or update its metadata.
///
/// Milestones are preserved across a metadata update; only the named
/// fields change.
pub fn save_book(store: &BookStore, details: BookDetails) -> Result<BookReport, EngineError> {
    let _lock = BookLock::acquire(store.paths(), &details.id)?;
    let (mut book, fingerprint) = store.load_or_new(&details.id)?;
    let created = fingerprint.is_none();

    if let Some(title) = details.title {
        book.title = title;
    }
    if let Some(image_url) = details.image_url {
        book.image_url = image_url;
    }
    if let Some(authors) = details.authors {
        book.authors = authors;
    }

    store.save_guarded(&book, fingerprint.as_ref())?;

    Ok(BookReport {
        book: details.id,
        created,
    })
}

/// A book prepared for display.
#[derive(Debug)]
pub struct BookView {
    /// The book with milestones already in display order.
    pub book: Book,
    pub warnings: Vec<String>,
}

/// Load a book for display, milestones sorted by order (stable).
///
/// Viewing an absent book shows the empty book, with a warning so
/// interactive users see the difference.
pub fn view_book(store: &BookStore, id: &BookId) -> Result<BookView, EngineError> {
    let (mut book, fingerprint) = store.load_or_new(id)?;

    let mut warnings = Vec::new();
    if fingerprint.is_none() {
        warnings.push(format!("book '{id}' does not exist yet; showing an empty book"));
    }

    book.sort_for_display();
    Ok(BookView { book, warnings })
}

/// One line of the library listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub milestones: usize,
}

/// Summarize every book in the library, sorted by id.
pub fn list_books(store: &BookStore) -> Result<Vec<BookSummary>, EngineError> {
    let mut summaries = Vec::new();
    for id in store.list()? {
        if let Some(loaded) = store.load(&id)? {
            summaries.push(BookSummary {
                id,
                title: loaded.book.title,
                milestones: loaded.book.milestones.len(),
            });
        }
    }
    Ok(summaries)
}
