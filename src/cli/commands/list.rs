//! list command - List the books in the library

use anyhow::Result;

use crate::engine::{self, Context};
use crate::ui::output::{self, Verbosity};

/// List every book in the library with its milestone count.
pub fn list(ctx: &Context) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    let store = engine::resolve_store(ctx)?;
    output::debug(
        format!("library root: {}", store.paths().root().display()),
        verbosity,
    );

    let summaries = engine::list_books(&store)?;
    if summaries.is_empty() {
        output::print("No books yet. Create one with 'chron book <id>'.", verbosity);
        return Ok(());
    }

    for summary in summaries {
        let title = if summary.title.is_empty() {
            "(untitled)"
        } else {
            &summary.title
        };
        let noun = if summary.milestones == 1 {
            "milestone"
        } else {
            "milestones"
        };
        println!("{}  {} ({} {})", summary.id, title, summary.milestones, noun);
    }

    Ok(())
}
