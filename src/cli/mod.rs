//! CLI layer for semantic-engine.
//!
//! Provides the command-line interface using clap, with commands for
//! splitting text and for ingesting, inspecting and verifying stored
//! documents.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
