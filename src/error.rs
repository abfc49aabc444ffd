//! Error types for semantic-engine operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! splitter, the storage layer, file I/O and CLI commands.

use thiserror::Error;

/// Result type alias for semantic-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage-related errors (database operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Chunking-related errors (text splitting).
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Storage-specific errors for database operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Storage not initialized (init command not run).
    #[error("database not initialized. Run: semantic-engine init")]
    NotInitialized,

    /// Document not found by ID or external ID.
    #[error("document not found: {identifier}")]
    DocNotFound {
        /// Document ID that was not found.
        identifier: String,
    },

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Transaction error.
    #[error("transaction error: {0}")]
    Transaction(String),
}

/// Chunking-specific errors for text splitting.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Rejected splitter argument, raised before any splitting happens.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Why the argument was rejected.
        reason: String,
    },

    /// Invalid UTF-8 encountered at specific byte offset.
    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where invalid UTF-8 was found.
        offset: usize,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Memory mapping error.
    #[error("memory mapping failed: {path}: {reason}")]
    MmapFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Command execution failed.
    #[error("command execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<regex::Error> for CommandError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidArgument(format!("invalid regex: {err}"))
    }
}

impl From<std::str::Utf8Error> for ChunkingError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::InvalidUtf8 {
            offset: err.valid_up_to(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err: Error = CommandError::ExecutionFailed("boom".to_string()).into();
        assert_eq!(err.to_string(), "command error: command execution failed: boom");
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::NotInitialized;
        assert_eq!(
            err.to_string(),
            "database not initialized. Run: semantic-engine init"
        );

        let err = StorageError::DocNotFound {
            identifier: "abc123".to_string(),
        };
        assert_eq!(err.to_string(), "document not found: abc123");
    }

    #[test]
    fn test_chunking_error_display() {
        let err = ChunkingError::InvalidArgument {
            reason: "chunk_size must be greater than 0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid argument: chunk_size must be greater than 0"
        );

        let err = ChunkingError::InvalidUtf8 { offset: 42 };
        assert_eq!(err.to_string(), "invalid UTF-8 at byte offset 42");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_chunking() {
        let err: Error = ChunkingError::InvalidUtf8 { offset: 0 }.into();
        assert!(matches!(err, Error::Chunking(_)));
        assert!(err.to_string().starts_with("chunking error"));
    }

    #[test]
    fn test_error_from_command() {
        let err: Error = CommandError::InvalidArgument("x".to_string()).into();
        assert!(matches!(err, Error::Command(_)));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let err: Error = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, Error::Storage(StorageError::Database(_))));
    }

    #[test]
    #[allow(clippy::invalid_regex)]
    fn test_from_regex_error() {
        let regex_err = regex::Regex::new("[invalid").unwrap_err();
        let err: CommandError = regex_err.into();
        assert!(matches!(err, CommandError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_utf8_error() {
        let invalid_bytes: Vec<u8> = vec![b'o', b'k', 0xff, 0xfe];
        let utf8_err = std::str::from_utf8(&invalid_bytes).unwrap_err();
        let err: ChunkingError = utf8_err.into();
        assert!(matches!(err, ChunkingError::InvalidUtf8 { offset: 2 }));
    }
}
