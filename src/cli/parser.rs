//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::chunking::DEFAULT_CHUNK_SIZE;

/// semantic-engine: boundary-aware text chunking and document storage.
///
/// Splits documents into bounded-size chunks that prefer markdown headings,
/// paragraphs, lines and words, and stores them for later retrieval.
#[derive(Parser, Debug)]
#[command(name = "semantic-engine")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the database file.
    ///
    /// Defaults to `.semantic-engine/engine.db` in the current directory.
    #[arg(short, long, env = "SEMANTIC_ENGINE_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Enable verbose output (info-level logs on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Show database status.
    Status,

    /// Delete all documents and chunks.
    Reset {
        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Split a file (or stdin) and print its chunks.
    ///
    /// Does not touch the database.
    Split {
        /// File to split. Reads stdin when omitted.
        file: Option<PathBuf>,

        /// Maximum chunk length in characters.
        #[arg(
            short = 's',
            long,
            env = "SEMANTIC_ENGINE_CHUNK_SIZE",
            default_value_t = DEFAULT_CHUNK_SIZE
        )]
        chunk_size: usize,
    },

    /// Split files and store them with their chunks.
    Ingest {
        /// Files to ingest.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Maximum chunk length in characters.
        #[arg(
            short = 's',
            long,
            env = "SEMANTIC_ENGINE_CHUNK_SIZE",
            default_value_t = DEFAULT_CHUNK_SIZE
        )]
        chunk_size: usize,

        /// Document origin (community-archive, rss, file).
        #[arg(short, long, default_value = "file")]
        origin: String,

        /// Author recorded on each document.
        #[arg(short, long, default_value = "unknown")]
        author: String,

        /// URL recorded on each document.
        #[arg(short, long)]
        url: Option<String>,

        /// Re-split and store documents even if their content is unchanged.
        #[arg(short, long)]
        force: bool,
    },

    /// List all documents.
    #[command(alias = "ls")]
    List,

    /// Show document details.
    Show {
        /// Document ID or external ID.
        doc: String,

        /// Show chunks as well.
        #[arg(short, long)]
        chunks: bool,
    },

    /// Delete a document and its chunks.
    #[command(alias = "rm")]
    Delete {
        /// Document ID or external ID.
        doc: String,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check that a document's stored chunks reassemble its content.
    Verify {
        /// Document ID or external ID.
        doc: String,
    },

    /// Search a document's chunks with a regex.
    Grep {
        /// Document ID or external ID.
        doc: String,

        /// Search pattern (regex).
        pattern: String,

        /// Maximum number of matches.
        #[arg(short = 'n', long, default_value = "20")]
        max_matches: usize,

        /// Case-insensitive search.
        #[arg(short, long)]
        ignore_case: bool,
    },
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}
