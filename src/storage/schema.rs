//! Database schema definitions.

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL schema for initial database setup.
pub const SCHEMA_SQL: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_info (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Root documents (one per thread, feed entry or file)
CREATE TABLE IF NOT EXISTS docs (
    id TEXT PRIMARY KEY NOT NULL,
    external_id TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    origin TEXT NOT NULL,
    url TEXT,
    content TEXT NOT NULL,
    ingested_at INTEGER DEFAULT (strftime('%s', 'now')),
    author TEXT NOT NULL,
    checksum TEXT NOT NULL
);

-- Index for duplicate detection by content checksum
CREATE INDEX IF NOT EXISTS idx_docs_checksum ON docs(checksum);

-- Index for resolving documents by external ID
CREATE INDEX IF NOT EXISTS idx_docs_external_id ON docs(external_id);

-- Chunks (character-positioned segments of doc content)
CREATE TABLE IF NOT EXISTS chunks (
    id INTEGER PRIMARY KEY,
    doc_id TEXT NOT NULL,
    content TEXT NOT NULL,
    start_position INTEGER NOT NULL,
    end_position INTEGER NOT NULL,
    FOREIGN KEY (doc_id) REFERENCES docs(id) ON DELETE CASCADE
);

-- Index for ordered chunk lookup by doc
CREATE INDEX IF NOT EXISTS idx_chunks_doc ON chunks(doc_id, start_position);
";

/// SQL to check if schema is initialized.
pub const CHECK_SCHEMA_SQL: &str = r"
SELECT COUNT(*) FROM sqlite_master
WHERE type='table' AND name='schema_info';
";

/// SQL to get schema version.
pub const GET_VERSION_SQL: &str = r"
SELECT value FROM schema_info WHERE key = 'version';
";

/// SQL to set schema version.
pub const SET_VERSION_SQL: &str = r"
INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?);
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version() {
        const _: () = assert!(CURRENT_SCHEMA_VERSION >= 1);
    }

    #[test]
    fn test_schema_sql_tables() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS docs"));
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS chunks"));
        assert!(SCHEMA_SQL.contains("ON DELETE CASCADE"));
    }
}
