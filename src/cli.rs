use crate::core::{DEFAULT_MAX_BULLETS, DEFAULT_TEMPLATE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deckgen")]
#[command(about = "Turn videos, text, and documents into PowerPoint decks")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Force CLI mode (skip TUI)
    #[arg(long)]
    pub cli: bool,

    /// Backend base URL (overrides DECKGEN_BACKEND)
    #[arg(long, global = true)]
    pub backend: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a deck from a YouTube video
    Video {
        /// YouTube video URL
        url: String,

        /// Template id (see `templates` for the catalog)
        #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
        template: String,

        /// Deck name (defaults to the first slide heading)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Generate a deck from raw text
    Text {
        /// Read the text from this file instead of stdin
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Template id
        #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
        template: String,

        /// Deck name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Generate a deck from a document (doc, docx, pdf or txt)
    Document {
        /// Path to the document
        path: PathBuf,

        /// Template id
        #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
        template: String,

        /// Deck name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Export a stored deck to a .pptx file
    Export {
        /// Deck id (see `list`)
        deck: String,

        /// Output path (defaults to exports/<deck>.pptx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bullet points per page
        #[arg(long, default_value_t = DEFAULT_MAX_BULLETS)]
        max_bullets: usize,
    },

    /// List stored decks and exports
    List,

    /// Print a stored deck's outline
    Show {
        /// Deck id
        deck: String,
    },

    /// Delete a stored deck and its export
    Delete {
        /// Deck id
        deck: String,
    },

    /// Print the template catalog
    Templates,

    /// Open TUI interface
    Tui,
}
