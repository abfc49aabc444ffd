//! Storage trait definition.
//!
//! Defines the interface the ingestion pipeline persists documents and
//! their chunks through.

use crate::core::{Chunk, Doc, StoredChunk};
use crate::error::Result;
use serde::Serialize;

/// Trait for persistent storage backends.
pub trait Storage: Send {
    /// Initializes storage (creates schema).
    ///
    /// Idempotent: safe to call multiple times.
    fn init(&mut self) -> Result<()>;

    /// Checks if storage is initialized.
    fn is_initialized(&self) -> Result<bool>;

    /// Deletes all documents and chunks, preserving the schema.
    fn reset(&mut self) -> Result<()>;

    // ==================== Document Operations ====================

    /// Stores a document together with its chunks in one transaction,
    /// replacing any previous version of the document and its chunks.
    fn store_doc(&mut self, doc: &Doc, chunks: &[Chunk]) -> Result<()>;

    /// Retrieves a document by ID.
    fn get_doc(&self, id: &str) -> Result<Option<Doc>>;

    /// Finds every document whose content has the given checksum, oldest
    /// ingestion first.
    fn find_docs_by_checksum(&self, checksum: &str) -> Result<Vec<Doc>>;

    /// Finds every document with the given external ID, one per origin at
    /// most, oldest ingestion first.
    fn find_docs_by_external_id(&self, external_id: &str) -> Result<Vec<Doc>>;

    /// Lists all documents, oldest ingestion first.
    fn list_docs(&self) -> Result<Vec<Doc>>;

    /// Deletes a document and its chunks. Returns `false` if it did not exist.
    fn delete_doc(&mut self, id: &str) -> Result<bool>;

    /// Returns the number of stored documents.
    fn doc_count(&self) -> Result<usize>;

    // ==================== Chunk Operations ====================

    /// Retrieves a document's chunks ordered by start position.
    fn get_chunks(&self, doc_id: &str) -> Result<Vec<StoredChunk>>;

    /// Returns the number of chunks stored for a document.
    fn chunk_count(&self, doc_id: &str) -> Result<usize>;

    /// Gets storage statistics.
    fn stats(&self) -> Result<StorageStats>;
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// Number of documents stored.
    pub doc_count: usize,
    /// Total number of chunks across all documents.
    pub chunk_count: usize,
    /// Total size of all document content in bytes.
    pub total_content_size: usize,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}
