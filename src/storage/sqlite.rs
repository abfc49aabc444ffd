//! `SQLite` storage implementation.

// SQLite stores all integers as i64. Positions and counts are
// non-negative and fit in usize.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use crate::core::doc::current_timestamp;
use crate::core::{Chunk, Doc, Origin, StoredChunk};
use crate::error::{Result, StorageError};
use crate::storage::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::storage::traits::{Storage, StorageStats};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DOC_COLUMNS: &str =
    "id, external_id, created_at, origin, url, content, ingested_at, author, checksum";

/// SQLite-based storage implementation.
///
/// # Examples
///
/// ```no_run
/// use semantic_engine::storage::{SqliteStorage, Storage};
///
/// let mut storage = SqliteStorage::open("engine.db").unwrap();
/// storage.init().unwrap();
/// ```
pub struct SqliteStorage {
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteStorage {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Database(e.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        // WAL lets readers proceed while an ingest is writing.
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn doc_from_row(row: &Row<'_>) -> rusqlite::Result<Doc> {
        let origin: String = row.get(3)?;
        let origin = origin
            .parse::<Origin>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Doc {
            id: row.get(0)?,
            external_id: row.get(1)?,
            created_at: row.get(2)?,
            origin,
            url: row.get(4)?,
            content: row.get(5)?,
            ingested_at: row.get(6)?,
            author: row.get(7)?,
            checksum: row.get(8)?,
        })
    }

    fn query_doc(&self, filter: &str, value: &str) -> Result<Option<Doc>> {
        let sql = format!("SELECT {DOC_COLUMNS} FROM docs WHERE {filter} = ? LIMIT 1");
        let doc = self
            .conn
            .query_row(&sql, params![value], Self::doc_from_row)
            .optional()
            .map_err(StorageError::from)?;
        Ok(doc)
    }

    fn query_docs(&self, filter: &str, value: &str) -> Result<Vec<Doc>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {DOC_COLUMNS} FROM docs WHERE {filter} = ? ORDER BY ingested_at, id"
            ))
            .map_err(StorageError::from)?;

        let docs = stmt
            .query_map(params![value], Self::doc_from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(docs)
    }

    fn insert_chunks(tx: &Transaction<'_>, doc_id: &str, chunks: &[Chunk]) -> Result<()> {
        let mut stmt = tx
            .prepare(
                r"
            INSERT INTO chunks (doc_id, content, start_position, end_position)
            VALUES (?, ?, ?, ?)
        ",
            )
            .map_err(StorageError::from)?;

        for chunk in chunks {
            stmt.execute(params![
                doc_id,
                chunk.content,
                chunk.start_position as i64,
                chunk.end_position as i64,
            ])
            .map_err(StorageError::from)?;
        }
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn init(&mut self) -> Result<()> {
        if self.is_initialized()? {
            if let Some(current) = self.get_schema_version()?
                && current > CURRENT_SCHEMA_VERSION
            {
                return Err(StorageError::Migration(format!(
                    "database schema v{current} is newer than supported v{CURRENT_SCHEMA_VERSION}"
                ))
                .into());
            }
            return Ok(());
        }

        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(StorageError::from)?;
        self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        info!(version = CURRENT_SCHEMA_VERSION, "created schema");
        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(CHECK_SCHEMA_SQL, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn reset(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            DELETE FROM chunks;
            DELETE FROM docs;
        ",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    // ==================== Document Operations ====================

    fn store_doc(&mut self, doc: &Doc, chunks: &[Chunk]) -> Result<()> {
        let ingested_at = doc.ingested_at.unwrap_or_else(current_timestamp);
        let tx = self
            .conn
            .transaction()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        tx.execute("DELETE FROM chunks WHERE doc_id = ?", params![doc.id])
            .map_err(StorageError::from)?;
        tx.execute("DELETE FROM docs WHERE id = ?", params![doc.id])
            .map_err(StorageError::from)?;
        tx.execute(
            &format!("INSERT INTO docs ({DOC_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"),
            params![
                doc.id,
                doc.external_id,
                doc.created_at,
                doc.origin.as_str(),
                doc.url,
                doc.content,
                ingested_at,
                doc.author,
                doc.checksum,
            ],
        )
        .map_err(StorageError::from)?;
        Self::insert_chunks(&tx, &doc.id, chunks)?;

        tx.commit()
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        debug!(doc_id = %doc.id, chunks = chunks.len(), "stored document");
        Ok(())
    }

    fn get_doc(&self, id: &str) -> Result<Option<Doc>> {
        self.query_doc("id", id)
    }

    fn find_docs_by_checksum(&self, checksum: &str) -> Result<Vec<Doc>> {
        self.query_docs("checksum", checksum)
    }

    fn find_docs_by_external_id(&self, external_id: &str) -> Result<Vec<Doc>> {
        self.query_docs("external_id", external_id)
    }

    fn list_docs(&self) -> Result<Vec<Doc>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {DOC_COLUMNS} FROM docs ORDER BY ingested_at, id"
            ))
            .map_err(StorageError::from)?;

        let docs = stmt
            .query_map([], Self::doc_from_row)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(docs)
    }

    fn delete_doc(&mut self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM docs WHERE id = ?", params![id])
            .map_err(StorageError::from)?;
        Ok(deleted > 0)
    }

    fn doc_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM docs", [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }

    // ==================== Chunk Operations ====================

    fn get_chunks(&self, doc_id: &str) -> Result<Vec<StoredChunk>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT id, doc_id, content, start_position, end_position
            FROM chunks WHERE doc_id = ? ORDER BY start_position, id
        ",
            )
            .map_err(StorageError::from)?;

        let chunks = stmt
            .query_map(params![doc_id], |row| {
                Ok(StoredChunk {
                    id: row.get(0)?,
                    doc_id: row.get(1)?,
                    chunk: Chunk {
                        content: row.get(2)?,
                        start_position: row.get::<_, i64>(3)? as usize,
                        end_position: row.get::<_, i64>(4)? as usize,
                    },
                })
            })
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(chunks)
    }

    fn chunk_count(&self, doc_id: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM chunks WHERE doc_id = ?",
                params![doc_id],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;
        Ok(count as usize)
    }

    fn stats(&self) -> Result<StorageStats> {
        let doc_count = self.doc_count()?;

        let chunk_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        let total_size: i64 = self
            .conn
            .query_row(
                "SELECT COALESCE(SUM(LENGTH(CAST(content AS BLOB))), 0) FROM docs",
                [],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;

        let schema_version = self.get_schema_version()?.unwrap_or(0);

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(StorageStats {
            doc_count,
            chunk_count: chunk_count as usize,
            total_content_size: total_size as usize,
            schema_version,
            db_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::split_text;
    use crate::error::Error;

    fn setup() -> SqliteStorage {
        let mut storage = SqliteStorage::in_memory().unwrap();
        storage.init().unwrap();
        storage
    }

    fn sample_doc(external_id: &str, content: &str) -> Doc {
        Doc::new(Origin::Rss, external_id, "author", content.to_string())
    }

    #[test]
    fn test_init() {
        let storage = setup();
        assert!(storage.is_initialized().unwrap());
        assert!(storage.path().is_none());
    }

    #[test]
    fn test_init_idempotent() {
        let mut storage = setup();
        storage.init().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_init_rejects_newer_schema() {
        let mut storage = setup();
        storage.set_schema_version(CURRENT_SCHEMA_VERSION + 1).unwrap();
        let result = storage.init();
        assert!(matches!(
            result,
            Err(Error::Storage(StorageError::Migration(_)))
        ));
    }

    #[test]
    fn test_store_and_get_doc() {
        let mut storage = setup();
        let doc = sample_doc("e1", "Hello\n\nWorld").with_url(Some("https://x.test/e1".into()));
        let chunks = split_text(&doc.content, 6).unwrap();
        storage.store_doc(&doc, &chunks).unwrap();

        let loaded = storage.get_doc(&doc.id).unwrap().unwrap();
        assert_eq!(loaded.content, doc.content);
        assert_eq!(loaded.origin, Origin::Rss);
        assert_eq!(loaded.url.as_deref(), Some("https://x.test/e1"));
        assert!(loaded.ingested_at.is_some());

        let stored = storage.get_chunks(&doc.id).unwrap();
        let reloaded: Vec<Chunk> = stored.into_iter().map(|s| s.chunk).collect();
        assert_eq!(reloaded, chunks);
    }

    #[test]
    fn test_store_doc_replaces_previous_version() {
        let mut storage = setup();
        let first = sample_doc("e1", "one two three four five");
        storage
            .store_doc(&first, &split_text(&first.content, 5).unwrap())
            .unwrap();

        let second = sample_doc("e1", "short");
        storage
            .store_doc(&second, &split_text(&second.content, 5).unwrap())
            .unwrap();

        assert_eq!(storage.doc_count().unwrap(), 1);
        assert_eq!(storage.chunk_count(&second.id).unwrap(), 1);
        assert_eq!(storage.get_doc(&second.id).unwrap().unwrap().content, "short");
    }

    #[test]
    fn test_find_docs_by_checksum() {
        let mut storage = setup();
        let first = sample_doc("e1", "checksummed");
        let copy = sample_doc("e2", "checksummed");
        storage.store_doc(&first, &[]).unwrap();
        storage.store_doc(&copy, &[]).unwrap();
        storage.store_doc(&sample_doc("e3", "different"), &[]).unwrap();

        let found = storage.find_docs_by_checksum(&first.checksum).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|d| d.id == first.id));
        assert!(found.iter().any(|d| d.id == copy.id));
        assert!(storage.find_docs_by_checksum("nope").unwrap().is_empty());
    }

    #[test]
    fn test_cascade_delete() {
        let mut storage = setup();
        let doc = sample_doc("e1", "abcdefghij");
        storage
            .store_doc(&doc, &split_text(&doc.content, 3).unwrap())
            .unwrap();
        assert_eq!(storage.chunk_count(&doc.id).unwrap(), 4);

        assert!(storage.delete_doc(&doc.id).unwrap());
        assert_eq!(storage.chunk_count(&doc.id).unwrap(), 0);
        assert!(!storage.delete_doc(&doc.id).unwrap());
    }

    #[test]
    fn test_find_docs_by_external_id_spans_origins() {
        let mut storage = setup();
        let file = Doc::new(Origin::File, "a.md", "alice", "same text".to_string());
        let rss = Doc::new(Origin::Rss, "a.md", "alice", "same text".to_string());
        storage.store_doc(&file, &[]).unwrap();
        storage.store_doc(&rss, &[]).unwrap();
        storage.store_doc(&sample_doc("b.md", "other"), &[]).unwrap();

        let found = storage.find_docs_by_external_id("a.md").unwrap();
        let mut ids: Vec<_> = found.iter().map(|d| d.id.clone()).collect();
        ids.sort();
        let mut expected = vec![file.id.clone(), rss.id.clone()];
        expected.sort();
        assert_eq!(ids, expected);

        assert!(storage.find_docs_by_external_id("missing").unwrap().is_empty());
    }

    #[test]
    fn test_list_docs() {
        let mut storage = setup();
        storage.store_doc(&sample_doc("a", "A"), &[]).unwrap();
        storage.store_doc(&sample_doc("b", "B"), &[]).unwrap();
        assert_eq!(storage.list_docs().unwrap().len(), 2);
    }

    #[test]
    fn test_reset() {
        let mut storage = setup();
        let doc = sample_doc("e1", "content here");
        storage
            .store_doc(&doc, &split_text(&doc.content, 4).unwrap())
            .unwrap();

        storage.reset().unwrap();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.doc_count, 0);
        assert_eq!(stats.chunk_count, 0);
        assert!(storage.is_initialized().unwrap());
    }

    #[test]
    fn test_stats() {
        let mut storage = setup();
        let doc = sample_doc("e1", "héllo world");
        storage
            .store_doc(&doc, &split_text(&doc.content, 6).unwrap())
            .unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.doc_count, 1);
        assert_eq!(stats.chunk_count, 2);
        assert_eq!(stats.total_content_size, "héllo world".len());
        assert_eq!(stats.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(stats.db_size.is_none());
    }
}
