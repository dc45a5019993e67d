//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT touch book documents directly.

mod add;
mod book;
mod completion;
mod edit;
mod list;
mod show;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use book::book;
pub use completion::completion;
pub use edit::edit;
pub use list::list;
pub use show::show;

use crate::cli::args::Command;
use crate::engine::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::List => list::list(ctx),
        Command::Show { book } => show::show(ctx, &book),
        Command::Book {
            book: id,
            title,
            image_url,
            authors,
        } => book::book(ctx, &id, title, image_url, authors.as_deref()),
        Command::Add {
            book,
            after,
            header,
            caption,
            image_url,
            body,
        } => add::add(ctx, &book, after, header, caption, image_url, body),
        Command::Edit {
            book,
            milestone,
            header,
            caption,
            image_url,
            body,
        } => edit::edit(ctx, &book, milestone, header, caption, image_url, body),
        Command::Completion { shell } => completion::completion(shell),
    }
}
