//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--library <dir>`: Book storage root for this invocation
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Chronicle - curate books of ordered milestones
#[derive(Parser, Debug)]
#[command(name = "chron")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding one JSON document per book
    #[arg(long, global = true, value_name = "DIR")]
    pub library: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Shells with completion support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the books in the library
    List,

    /// Show a book with its milestones in display order
    Show {
        /// Book id
        book: String,
    },

    /// Create a book or update its metadata
    #[command(long_about = "Create a book or update its metadata.\n\n\
        Creating is implicit: saving metadata for an id nobody has used yet \
        creates the document. Updating touches only the fields you pass; \
        milestones are always preserved.")]
    Book {
        /// Book id (also the storage key; immutable once created)
        book: String,

        /// Book title
        #[arg(long)]
        title: Option<String>,

        /// Cover image URL
        #[arg(long = "image-url", value_name = "URL")]
        image_url: Option<String>,

        /// Authors, comma-separated, in display order
        #[arg(long, value_name = "A,B,C")]
        authors: Option<String>,
    },

    /// Insert a new milestone into a book
    #[command(
        long_about = "Insert a new milestone into a book.\n\n\
            Without --after the milestone is appended. With --after <id> it \
            lands immediately after that milestone and everything later \
            shifts down one position. Inserting into a book that does not \
            exist yet creates it.",
        after_help = "\
EXAMPLES:
    # Append a milestone
    chron add travels --header 'Crossing the Andes'

    # Insert right after milestone 3
    chron add travels --after 3 --header 'A detour' --body 'We turned south.'"
    )]
    Add {
        /// Book id
        book: String,

        /// Reference milestone id; the new milestone lands right after it
        #[arg(long, value_name = "ID")]
        after: Option<u32>,

        /// Milestone header
        #[arg(long, default_value = "")]
        header: String,

        /// Milestone caption
        #[arg(long, default_value = "")]
        caption: String,

        /// Milestone image URL
        #[arg(long = "image-url", value_name = "URL", default_value = "")]
        image_url: String,

        /// Milestone body text
        #[arg(long, default_value = "")]
        body: String,
    },

    /// Overwrite a milestone's text fields in place
    #[command(long_about = "Overwrite a milestone's text fields in place.\n\n\
        An edit replaces all four text fields; omitted flags store as empty. \
        The milestone's id and position never change. Editing an id that \
        does not exist leaves the book untouched and warns.")]
    Edit {
        /// Book id
        book: String,

        /// Milestone id to edit
        #[arg(value_name = "MILESTONE")]
        milestone: u32,

        /// Milestone header
        #[arg(long, default_value = "")]
        header: String,

        /// Milestone caption
        #[arg(long, default_value = "")]
        caption: String,

        /// Milestone image URL
        #[arg(long = "image-url", value_name = "URL", default_value = "")]
        image_url: String,

        /// Milestone body text
        #[arg(long, default_value = "")]
        body: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
