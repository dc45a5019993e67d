//! show command - Display a book with milestones in reading order

use anyhow::{Context as _, Result};

use crate::core::types::BookId;
use crate::engine::{self, Context};
use crate::ui::output::{self, Verbosity};

/// Display a book: metadata, then milestones in display order.
pub fn show(ctx: &Context, book: &str) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    let id = BookId::new(book).context("invalid book id")?;

    let store = engine::resolve_store(ctx)?;
    let view = engine::view_book(&store, &id)?;

    for warning in &view.warnings {
        output::warn(warning, verbosity);
    }

    let book = &view.book;
    let title = if book.title.is_empty() {
        book.file_name.as_str()
    } else {
        &book.title
    };
    println!("{title}");
    if !book.authors.is_empty() {
        println!("by {}", output::format_authors(&book.authors));
    }

    for (position, milestone) in book.milestones.iter().enumerate() {
        output::debug(
            format!(
                "milestone id={} order={}",
                milestone.id, milestone.order
            ),
            verbosity,
        );

        println!();
        println!("{}. {}", position + 1, milestone.header);
        if !milestone.caption.is_empty() {
            println!("   {}", milestone.caption);
        }
        if !milestone.body.is_empty() {
            for line in milestone.body.lines() {
                println!("   {line}");
            }
        }
    }

    Ok(())
}
