//! edit command - Overwrite a milestone's text fields in place

use anyhow::{Context as _, Result};

use crate::core::ordering::{ApplyOutcome, MilestoneDraft};
use crate::core::types::{BookId, MilestoneId};
use crate::engine::{self, Context, MilestoneRequest};
use crate::ui::output::{self, Verbosity};

/// Overwrite the four text fields of an existing milestone.
///
/// The milestone's id and position never change. A missing target warns
/// and leaves the book untouched.
#[allow(clippy::too_many_arguments)]
pub fn edit(
    ctx: &Context,
    book: &str,
    milestone: u32,
    header: String,
    caption: String,
    image_url: String,
    body: String,
) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    let book = BookId::new(book).context("invalid book id")?;
    let milestone = MilestoneId::new(milestone).context("invalid milestone id")?;

    let store = engine::resolve_store(ctx)?;

    let report = engine::save_milestone(
        &store,
        MilestoneRequest {
            book,
            milestone: Some(milestone),
            after: None,
            draft: MilestoneDraft {
                header,
                caption,
                image_url,
                body,
            },
        },
    )?;

    for warning in &report.warnings {
        output::warn(warning, verbosity);
    }

    if let ApplyOutcome::Edited { id } = report.outcome {
        output::print(
            format!("Updated milestone {id} in '{}'", report.book),
            verbosity,
        );
    }

    Ok(())
}
