//! File reading with memory mapping support.
//!
//! Small documents are read directly; large archives and feed dumps are
//! memory mapped so the kernel pages them in on demand.

// Memory mapping requires unsafe; the mapping is read-only.
#![allow(unsafe_code)]

use crate::error::{Error, IoError, Result};
use crate::io::unicode::validate_utf8;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Threshold for using memory mapping (1MB).
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Maximum file size to read into memory (1GB).
const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// File reader that picks direct reads or memory mapping by file size.
///
/// # Examples
///
/// ```no_run
/// use semantic_engine::io::FileReader;
///
/// let reader = FileReader::open("thread.md").unwrap();
/// let content = reader.read_to_string().unwrap();
/// ```
pub struct FileReader {
    file: File,
    size: u64,
    path: String,
}

impl FileReader {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, can't be opened or
    /// exceeds the maximum supported size.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();

        if !path_ref.exists() {
            return Err(IoError::FileNotFound { path: path_str }.into());
        }

        let file = File::open(path_ref).map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        let size = file
            .metadata()
            .map_err(|e| IoError::ReadFailed {
                path: path_str.clone(),
                reason: e.to_string(),
            })?
            .len();

        if size > MAX_FILE_SIZE {
            return Err(IoError::ReadFailed {
                path: path_str,
                reason: format!("file too large: {size} bytes (max: {MAX_FILE_SIZE} bytes)"),
            }
            .into());
        }

        Ok(Self {
            file,
            size,
            path: path_str,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the file content as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the content is not valid UTF-8.
    pub fn read_to_string(&self) -> Result<String> {
        if self.size >= MMAP_THRESHOLD {
            return self.read_mmap();
        }

        String::from_utf8(self.read_direct_bytes()?)
            .map_err(|e| self.invalid_utf8(e.utf8_error().valid_up_to()))
    }

    /// Validates the mapped bytes in place and copies them out once.
    fn read_mmap(&self) -> Result<String> {
        // Safety: the mapping is only read and dropped before returning.
        let mmap = unsafe {
            Mmap::map(&self.file).map_err(|e| IoError::MmapFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?
        };

        validate_utf8(&mmap)
            .map(str::to_owned)
            .map_err(|offset| self.invalid_utf8(offset))
    }

    fn invalid_utf8(&self, offset: usize) -> Error {
        IoError::ReadFailed {
            path: self.path.clone(),
            reason: format!("invalid UTF-8 at byte offset {offset}"),
        }
        .into()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read_direct_bytes(&self) -> Result<Vec<u8>> {
        let mut file = &self.file;
        let mut buffer = Vec::with_capacity(self.size as usize);
        file.read_to_end(&mut buffer)
            .map_err(|e| IoError::ReadFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(buffer)
    }
}

/// Reads a file to string, automatically choosing the best method.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    FileReader::open(path)?.read_to_string()
}
