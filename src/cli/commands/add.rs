//! add command - Insert a new milestone into a book

use anyhow::{Context as _, Result};

use crate::core::ordering::{ApplyOutcome, MilestoneDraft};
use crate::core::types::{BookId, MilestoneId};
use crate::engine::{self, Context, MilestoneRequest};
use crate::ui::output::{self, Verbosity};

/// Insert a new milestone, appending or landing after `--after <id>`.
///
/// Inserting into a book that does not exist yet creates the document.
#[allow(clippy::too_many_arguments)]
pub fn add(
    ctx: &Context,
    book: &str,
    after: Option<u32>,
    header: String,
    caption: String,
    image_url: String,
    body: String,
) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    let book = BookId::new(book).context("invalid book id")?;
    let after = after
        .map(MilestoneId::new)
        .transpose()
        .context("invalid --after id")?;

    let store = engine::resolve_store(ctx)?;
    output::debug(
        format!("library root: {}", store.paths().root().display()),
        verbosity,
    );

    let report = engine::save_milestone(
        &store,
        MilestoneRequest {
            book,
            milestone: None,
            after,
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

    if let ApplyOutcome::Inserted { id, order, .. } = report.outcome {
        output::debug(format!("assigned id {id}, order {order}"), verbosity);
        output::print(
            format!("Added milestone {id} to '{}'", report.book),
            verbosity,
        );
    }

    Ok(())
}
