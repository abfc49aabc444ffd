//! Storage layer for semantic-engine.
//!
//! Persists ingested documents and their chunks in `SQLite`. A document
//! and its chunks are always written in a single transaction.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageStats};

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".semantic-engine/engine.db";
