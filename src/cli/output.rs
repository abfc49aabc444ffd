//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{Chunk, CoverageReport, Doc, StoredChunk};
use crate::error::Error;
use crate::storage::traits::StorageStats;
use serde::Serialize;
use std::fmt::Write;

/// Graphemes shown in chunk previews.
const PREVIEW_GRAPHEMES: usize = 40;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StorageStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StorageStats) -> String {
    let mut output = String::new();
    output.push_str("semantic-engine status\n");
    output.push_str("======================\n\n");
    let _ = writeln!(output, "  Documents:     {}", stats.doc_count);
    let _ = writeln!(output, "  Chunks:        {}", stats.chunk_count);
    let _ = writeln!(
        output,
        "  Content size:  {}",
        format_size(stats.total_content_size)
    );
    let _ = writeln!(output, "  Schema:        v{}", stats.schema_version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {size} bytes");
    }
    output
}

/// Formats chunks produced by `split`.
#[must_use]
pub fn format_chunks(chunks: &[Chunk], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{} chunks:", chunks.len());
            for (i, chunk) in chunks.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "  [{i}] {}..={} ({} chars) {}",
                    chunk.start_position,
                    chunk.end_position,
                    chunk.len(),
                    escape_preview(chunk.preview(PREVIEW_GRAPHEMES))
                );
            }
            output
        }
        OutputFormat::Json => format_json(&chunks),
    }
}

/// Per-document outcome of an ingest run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    /// Document ID.
    pub doc_id: String,
    /// Source path as given on the command line.
    pub source: String,
    /// Number of chunks stored (0 when skipped).
    pub chunk_count: usize,
    /// Content length in characters.
    pub char_count: usize,
    /// Whether the document was unchanged and left as is.
    pub skipped: bool,
    /// ID of another stored document with identical content, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<String>,
}

/// Formats the result of an ingest run.
#[must_use]
pub fn format_ingest(outcomes: &[IngestOutcome], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            for o in outcomes {
                if o.skipped {
                    let _ = writeln!(output, "Unchanged {} ({})", o.source, o.doc_id);
                } else {
                    let _ = writeln!(
                        output,
                        "Ingested {} ({}) with {} chunks, {} chars",
                        o.source, o.doc_id, o.chunk_count, o.char_count
                    );
                }
                if let Some(other) = &o.duplicate_of {
                    let _ = writeln!(output, "  same content as {other}");
                }
            }
            output
        }
        OutputFormat::Json => format_json(&outcomes),
    }
}

/// Formats a document list.
#[must_use]
pub fn format_doc_list(docs: &[Doc], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_doc_list_text(docs),
        OutputFormat::Json => {
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct DocSummary<'a> {
                id: &'a str,
                external_id: &'a str,
                origin: &'a str,
                author: &'a str,
                size: usize,
                ingested_at: Option<i64>,
            }
            let summaries: Vec<DocSummary<'_>> = docs
                .iter()
                .map(|d| DocSummary {
                    id: &d.id,
                    external_id: &d.external_id,
                    origin: d.origin.as_str(),
                    author: &d.author,
                    size: d.content.len(),
                    ingested_at: d.ingested_at,
                })
                .collect();
            format_json(&summaries)
        }
    }
}

fn format_doc_list_text(docs: &[Doc]) -> String {
    if docs.is_empty() {
        return "No documents found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Documents:\n");
    let _ = writeln!(
        output,
        "{:<34} {:<18} {:<10} External ID",
        "ID", "Origin", "Size"
    );
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for doc in docs {
        let _ = writeln!(
            output,
            "{:<34} {:<18} {:<10} {}",
            doc.id,
            doc.origin,
            format_size(doc.content.len()),
            truncate(&doc.external_id, 30)
        );
    }

    output
}

/// Formats a single document, with its chunks when requested.
#[must_use]
pub fn format_doc(doc: &Doc, chunks: Option<&[StoredChunk]>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_doc_text(doc, chunks),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct DocWithChunks<'a> {
                doc: &'a Doc,
                #[serde(skip_serializing_if = "Option::is_none")]
                chunks: Option<&'a [StoredChunk]>,
            }
            format_json(&DocWithChunks { doc, chunks })
        }
    }
}

fn format_doc_text(doc: &Doc, chunks: Option<&[StoredChunk]>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Document: {}", doc.id);
    let _ = writeln!(output, "  External ID:  {}", doc.external_id);
    let _ = writeln!(output, "  Origin:       {}", doc.origin);
    let _ = writeln!(output, "  Author:       {}", doc.author);
    if let Some(ref url) = doc.url {
        let _ = writeln!(output, "  URL:          {url}");
    }
    let _ = writeln!(output, "  Created:      {}", doc.created_at);
    if let Some(ingested) = doc.ingested_at {
        let _ = writeln!(output, "  Ingested:     {ingested}");
    }
    let _ = writeln!(output, "  Characters:   {}", doc.char_len());
    let _ = writeln!(output, "  Checksum:     {}", doc.checksum);

    if let Some(chunks) = chunks {
        output.push('\n');
        output.push_str("Chunks:\n");
        let _ = writeln!(
            output,
            "{:<8} {:<10} {:<10} {:<8} Preview",
            "ID", "Start", "End", "Chars"
        );
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for stored in chunks {
            let chunk = &stored.chunk;
            let _ = writeln!(
                output,
                "{:<8} {:<10} {:<10} {:<8} {}",
                stored.id,
                chunk.start_position,
                chunk.end_position,
                chunk.len(),
                escape_preview(chunk.preview(PREVIEW_GRAPHEMES))
            );
        }
    }

    output
}

/// Formats a coverage report from `verify`.
#[must_use]
pub fn format_verify(doc_id: &str, report: &CoverageReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            if report.is_valid() {
                let _ = writeln!(
                    output,
                    "OK {doc_id}: {} chunks cover {} chars",
                    report.chunk_count, report.source_len
                );
            } else {
                let _ = writeln!(
                    output,
                    "FAILED {doc_id}: {} problems",
                    report.problems.len()
                );
                for problem in &report.problems {
                    let _ = writeln!(output, "  - {problem}");
                }
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            #[serde(rename_all = "camelCase")]
            struct VerifyOutput<'a> {
                doc_id: &'a str,
                valid: bool,
                #[serde(flatten)]
                report: &'a CoverageReport,
            }
            format_json(&VerifyOutput {
                doc_id,
                valid: report.is_valid(),
                report,
            })
        }
    }
}

/// A grep match result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrepMatch {
    /// Row ID of the chunk containing the match.
    pub chunk_id: i64,
    /// Character offset of the match in the document.
    pub position: usize,
    /// The matched text.
    pub matched: String,
    /// Start position of the containing chunk.
    pub chunk_start: usize,
    /// End position of the containing chunk (inclusive).
    pub chunk_end: usize,
}

/// Formats grep matches.
#[must_use]
pub fn format_grep_matches(matches: &[GrepMatch], pattern: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_grep_text(matches, pattern),
        OutputFormat::Json => format_json(&matches),
    }
}

fn format_grep_text(matches: &[GrepMatch], pattern: &str) -> String {
    if matches.is_empty() {
        return format!("No matches found for pattern: {pattern}\n");
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "Found {} matches for pattern: {pattern}\n",
        matches.len()
    );

    for m in matches {
        let _ = writeln!(
            output,
            "  char {} in chunk {} [{}..={}]: {}",
            m.position,
            m.chunk_id,
            m.chunk_start,
            m.chunk_end,
            escape_preview(&m.matched)
        );
    }

    output
}

/// Formats an error for output.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                success: bool,
                error: String,
            }
            format_json(&ErrorOutput {
                success: false,
                error: error.to_string(),
            })
        }
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}

fn escape_preview(s: &str) -> String {
    s.replace('\n', "\\n")
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Origin, verify_coverage};
    use crate::error::StorageError;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("unknown"), OutputFormat::Text);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(100), "100 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("héllo wörld", 6), "hél...");
    }

    #[test]
    fn test_format_status() {
        let stats = StorageStats {
            doc_count: 2,
            chunk_count: 10,
            total_content_size: 1024,
            schema_version: 1,
            db_size: Some(4096),
        };

        let text = format_status(&stats, OutputFormat::Text);
        assert!(text.contains("Documents:     2"));
        assert!(text.contains("Chunks:        10"));

        let json = format_status(&stats, OutputFormat::Json);
        assert!(json.contains("\"docCount\": 2"));
    }

    #[test]
    fn test_format_chunks_text_escapes_newlines() {
        let chunks = vec![Chunk::new(0, "a\nb".to_string())];
        let text = format_chunks(&chunks, OutputFormat::Text);
        assert!(text.starts_with("1 chunks:"));
        assert!(text.contains("[0] 0..=2 (3 chars) a\\nb"));
    }

    #[test]
    fn test_format_chunks_json() {
        let chunks = vec![Chunk::new(4, "word".to_string())];
        let json = format_chunks(&chunks, OutputFormat::Json);
        let parsed: Vec<Chunk> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, chunks);
        assert!(json.contains("\"startPosition\": 4"));
    }

    #[test]
    fn test_format_doc_list_empty() {
        assert_eq!(
            format_doc_list(&[], OutputFormat::Text),
            "No documents found.\n"
        );
    }

    #[test]
    fn test_format_doc_json_omits_chunks() {
        let doc = Doc::new(Origin::File, "notes.md", "me", "text".to_string());
        let json = format_doc(&doc, None, OutputFormat::Json);
        assert!(json.contains("\"externalId\": \"notes.md\""));
        assert!(!json.contains("\"chunks\""));
    }

    #[test]
    fn test_format_verify() {
        let chunks = vec![Chunk::new(0, "ab".to_string())];
        let ok = verify_coverage("ab", &chunks);
        assert!(format_verify("d1", &ok, OutputFormat::Text).starts_with("OK d1"));

        let bad = verify_coverage("abc", &chunks);
        let text = format_verify("d1", &bad, OutputFormat::Text);
        assert!(text.starts_with("FAILED d1"));

        let json = format_verify("d1", &bad, OutputFormat::Json);
        assert!(json.contains("\"valid\": false"));
    }

    #[test]
    fn test_format_error_json() {
        let err: Error = StorageError::NotInitialized.into();
        let json = format_error(&err, OutputFormat::Json);
        assert!(json.contains("\"success\": false"));
        assert!(json.contains("not initialized"));
    }

    #[test]
    fn test_format_ingest_reports_duplicates() {
        let outcomes = vec![
            IngestOutcome {
                doc_id: "aaa".to_string(),
                source: "a.md".to_string(),
                chunk_count: 2,
                char_count: 40,
                skipped: false,
                duplicate_of: None,
            },
            IngestOutcome {
                doc_id: "bbb".to_string(),
                source: "b.md".to_string(),
                chunk_count: 2,
                char_count: 40,
                skipped: false,
                duplicate_of: Some("aaa".to_string()),
            },
        ];

        let text = format_ingest(&outcomes, OutputFormat::Text);
        assert!(text.contains("Ingested b.md (bbb) with 2 chunks, 40 chars\n  same content as aaa"));
        assert_eq!(text.matches("same content").count(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&format_ingest(&outcomes, OutputFormat::Json)).unwrap();
        assert!(json[0].get("duplicateOf").is_none());
        assert_eq!(json[1]["duplicateOf"], "aaa");
    }
}
