//! book command - Create a book or update its metadata

use anyhow::{Context as _, Result};

use crate::core::types::BookId;
use crate::engine::{self, BookDetails, Context};
use crate::ui::output::{self, Verbosity};

/// Create a book or update its metadata.
///
/// Only the fields passed on the command line change; milestones are
/// always preserved.
pub fn book(
    ctx: &Context,
    id: &str,
    title: Option<String>,
    image_url: Option<String>,
    authors: Option<&str>,
) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    let id = BookId::new(id).context("invalid book id")?;
    let authors = authors.map(parse_authors);

    let store = engine::resolve_store(ctx)?;
    let report = engine::save_book(
        &store,
        BookDetails {
            id,
            title,
            image_url,
            authors,
        },
    )?;

    let verb = if report.created { "Created" } else { "Updated" };
    output::print(format!("{verb} book '{}'", report.book), verbosity);

    Ok(())
}

/// Split a comma-separated author list, trimming whitespace and dropping
/// empty segments. Order is preserved.
fn parse_authors(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
