//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::chunking::{ParallelSplitter, RecursiveSplitter, Splitter};
use crate::cli::output::{
    GrepMatch, IngestOutcome, OutputFormat, format_chunks, format_doc, format_doc_list,
    format_grep_matches, format_ingest, format_status, format_verify,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::{Chunk, Doc, Origin, verify_coverage};
use crate::error::{ChunkingError, CommandError, Result, StorageError};
use crate::io::{byte_to_char_offset, read_file};
use crate::storage::{SqliteStorage, Storage};
use regex::RegexBuilder;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force),
        Commands::Status => cmd_status(&db_path, format),
        Commands::Reset { yes } => cmd_reset(&db_path, *yes),
        Commands::Split { file, chunk_size } => cmd_split(file.as_deref(), *chunk_size, format),
        Commands::Ingest {
            files,
            chunk_size,
            origin,
            author,
            url,
            force,
        } => {
            let origin: Origin = origin.parse()?;
            let options = IngestOptions {
                chunk_size: *chunk_size,
                origin,
                author,
                url: url.as_deref(),
                force: *force,
            };
            cmd_ingest(&db_path, files, &options, format)
        }
        Commands::List => cmd_list(&db_path, format),
        Commands::Show { doc, chunks } => cmd_show(&db_path, doc, *chunks, format),
        Commands::Delete { doc, yes } => cmd_delete(&db_path, doc, *yes),
        Commands::Verify { doc } => cmd_verify(&db_path, doc, format),
        Commands::Grep {
            doc,
            pattern,
            max_matches,
            ignore_case,
        } => cmd_grep(&db_path, doc, pattern, *max_matches, *ignore_case, format),
    }
}

/// Opens storage and ensures it's initialized.
fn open_storage(db_path: &Path) -> Result<SqliteStorage> {
    let storage = SqliteStorage::open(db_path)?;

    if !storage.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(storage)
}

/// Resolves a document identifier (ID or external ID) to a document.
///
/// An external ID shared by documents of several origins is rejected as
/// ambiguous; the caller must pass one of the document IDs instead.
fn resolve_doc(storage: &SqliteStorage, identifier: &str) -> Result<Doc> {
    if let Some(doc) = storage.get_doc(identifier)? {
        return Ok(doc);
    }

    let mut matches = storage.find_docs_by_external_id(identifier)?;
    match matches.len() {
        0 => Err(StorageError::DocNotFound {
            identifier: identifier.to_string(),
        }
        .into()),
        1 => Ok(matches.remove(0)),
        n => {
            let candidates: Vec<String> = matches
                .iter()
                .map(|d| format!("{} ({})", d.id, d.origin))
                .collect();
            Err(CommandError::InvalidArgument(format!(
                "'{identifier}' matches {n} documents: {}; use a document ID",
                candidates.join(", ")
            ))
            .into())
        }
    }
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool) -> Result<String> {
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    let mut storage = SqliteStorage::open(db_path)?;
    storage.init()?;

    Ok(format!("Initialized database at: {}\n", db_path.display()))
}

fn cmd_status(db_path: &Path, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let stats = storage.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_reset(db_path: &Path, yes: bool) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(
            "Use --yes to confirm reset. This will delete all data.".to_string(),
        )
        .into());
    }

    let mut storage = open_storage(db_path)?;
    storage.reset()?;
    info!("reset database");

    Ok("All documents and chunks deleted.\n".to_string())
}

fn cmd_split(file: Option<&Path>, chunk_size: usize, format: OutputFormat) -> Result<String> {
    let text = match file {
        Some(path) => read_file(path)?,
        None => read_stdin()?,
    };

    let chunks = RecursiveSplitter::with_size(chunk_size).split(&text)?;
    Ok(format_chunks(&chunks, format))
}

fn read_stdin() -> Result<String> {
    let mut bytes = Vec::new();
    io::stdin().read_to_end(&mut bytes)?;
    String::from_utf8(bytes).map_err(|e| ChunkingError::from(e.utf8_error()).into())
}

struct IngestOptions<'a> {
    chunk_size: usize,
    origin: Origin,
    author: &'a str,
    url: Option<&'a str>,
    force: bool,
}

fn cmd_ingest(
    db_path: &Path,
    files: &[PathBuf],
    options: &IngestOptions<'_>,
    format: OutputFormat,
) -> Result<String> {
    let splitter = RecursiveSplitter::with_size(options.chunk_size);
    splitter.validate()?;
    info!(
        splitter = splitter.name(),
        chunk_size = splitter.chunk_size(),
        files = files.len(),
        "ingesting"
    );

    let mut storage = open_storage(db_path)?;

    let mut outcomes = Vec::with_capacity(files.len());
    let mut slots: Vec<usize> = Vec::new();
    let mut docs: Vec<Doc> = Vec::new();

    for file in files {
        let content = read_file(file)?;
        let external_id = file.to_string_lossy();
        let doc = Doc::new(options.origin, &external_id, options.author, content)
            .with_url(options.url.map(String::from));

        let unchanged = storage
            .get_doc(&doc.id)?
            .is_some_and(|existing| existing.checksum == doc.checksum);

        if unchanged && !options.force {
            debug!(doc_id = %doc.id, source = %external_id, "content unchanged, skipping");
            outcomes.push(IngestOutcome {
                doc_id: doc.id.clone(),
                source: external_id.into_owned(),
                chunk_count: 0,
                char_count: doc.char_len(),
                skipped: true,
                duplicate_of: None,
            });
            continue;
        }

        let duplicate_of = match docs
            .iter()
            .find(|d| d.checksum == doc.checksum && d.id != doc.id)
        {
            Some(earlier) => Some(earlier.id.clone()),
            None => storage
                .find_docs_by_checksum(&doc.checksum)?
                .into_iter()
                .find(|d| d.id != doc.id)
                .map(|d| d.id),
        };
        if let Some(other) = &duplicate_of {
            info!(doc_id = %doc.id, duplicate_of = %other, "content already stored under another document");
        }

        slots.push(outcomes.len());
        outcomes.push(IngestOutcome {
            doc_id: doc.id.clone(),
            source: external_id.into_owned(),
            chunk_count: 0,
            char_count: doc.char_len(),
            skipped: false,
            duplicate_of,
        });
        docs.push(doc);
    }

    let batch: Vec<(usize, &str)> = slots
        .iter()
        .zip(&docs)
        .map(|(slot, doc)| (*slot, doc.content.as_str()))
        .collect();
    let results = ParallelSplitter::new(splitter).split_all(&batch)?;

    for (doc, (slot, chunks)) in docs.iter().zip(results) {
        let report = verify_coverage(&doc.content, &chunks);
        if !report.is_valid() {
            warn!(doc_id = %doc.id, problems = ?report.problems, "chunks do not tile document");
            return Err(CommandError::ExecutionFailed(format!(
                "chunks for {} do not reassemble the document",
                doc.id
            ))
            .into());
        }

        storage.store_doc(doc, &chunks)?;
        outcomes[slot].chunk_count = chunks.len();
        info!(doc_id = %doc.id, chunks = chunks.len(), "ingested document");
    }

    Ok(format_ingest(&outcomes, format))
}

fn cmd_list(db_path: &Path, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let docs = storage.list_docs()?;
    Ok(format_doc_list(&docs, format))
}

fn cmd_show(
    db_path: &Path,
    identifier: &str,
    show_chunks: bool,
    format: OutputFormat,
) -> Result<String> {
    let storage = open_storage(db_path)?;
    let doc = resolve_doc(&storage, identifier)?;

    let chunks = if show_chunks {
        Some(storage.get_chunks(&doc.id)?)
    } else {
        None
    };

    Ok(format_doc(&doc, chunks.as_deref(), format))
}

fn cmd_delete(db_path: &Path, identifier: &str, yes: bool) -> Result<String> {
    if !yes {
        return Err(
            CommandError::ExecutionFailed("Use --yes to confirm deletion.".to_string()).into(),
        );
    }

    let mut storage = open_storage(db_path)?;
    let doc = resolve_doc(&storage, identifier)?;
    storage.delete_doc(&doc.id)?;

    Ok(format!("Deleted document: {} ({})\n", doc.id, doc.external_id))
}

fn cmd_verify(db_path: &Path, identifier: &str, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let doc = resolve_doc(&storage, identifier)?;

    let chunks: Vec<Chunk> = storage
        .get_chunks(&doc.id)?
        .into_iter()
        .map(|stored| stored.chunk)
        .collect();
    let report = verify_coverage(&doc.content, &chunks);

    let output = format_verify(&doc.id, &report, format);
    if report.is_valid() {
        Ok(output)
    } else {
        Err(CommandError::ExecutionFailed(output.trim_end().to_string()).into())
    }
}

fn cmd_grep(
    db_path: &Path,
    identifier: &str,
    pattern: &str,
    max_matches: usize,
    ignore_case: bool,
    format: OutputFormat,
) -> Result<String> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(CommandError::from)?;

    let storage = open_storage(db_path)?;
    let doc = resolve_doc(&storage, identifier)?;

    let mut matches = Vec::new();
    'chunks: for stored in storage.get_chunks(&doc.id)? {
        let chunk = &stored.chunk;
        for m in regex.find_iter(&chunk.content) {
            if matches.len() >= max_matches {
                break 'chunks;
            }
            matches.push(GrepMatch {
                chunk_id: stored.id,
                position: chunk.start_position + byte_to_char_offset(&chunk.content, m.start()),
                matched: m.as_str().to_string(),
                chunk_start: chunk.start_position,
                chunk_end: chunk.end_position,
            });
        }
    }

    Ok(format_grep_matches(&matches, pattern, format))
}
