//! Core domain models.
//!
//! Documents and the chunks produced from them. These are pure domain
//! models with no I/O dependencies.

pub mod chunk;
pub mod doc;

pub use chunk::{Chunk, CoverageReport, StoredChunk, verify_coverage};
pub use doc::{Doc, Origin, checksum};
