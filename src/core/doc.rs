//! Source documents.
//!
//! A document is the unit of ingestion: one tweet thread, one feed entry or
//! one file. Its content is split into chunks which are stored against the
//! document ID.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::CommandError;

/// Where a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// A thread reconstructed from a community tweet archive.
    CommunityArchive,
    /// An RSS or Atom feed entry.
    Rss,
    /// A local file.
    File,
}

impl Origin {
    /// Returns the stable name stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommunityArchive => "community-archive",
            Self::Rss => "rss",
            Self::File => "file",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Origin {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "community-archive" | "archive" => Ok(Self::CommunityArchive),
            "rss" | "feed" => Ok(Self::Rss),
            "file" => Ok(Self::File),
            other => Err(CommandError::InvalidArgument(format!(
                "unknown origin '{other}' (expected community-archive, rss or file)"
            ))),
        }
    }
}

/// A source document.
///
/// # Examples
///
/// ```
/// use semantic_engine::core::{Doc, Origin};
///
/// let doc = Doc::new(Origin::Rss, "entry-1", "alice", "Body text".to_string());
/// assert_eq!(doc.id, Doc::derive_id(Origin::Rss, "entry-1"));
/// assert_eq!(doc.checksum.len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doc {
    /// Stable identifier derived from origin and external ID.
    pub id: String,

    /// Identifier in the source system (tweet ID, feed GUID, file path).
    pub external_id: String,

    /// Unix timestamp when the source was created.
    pub created_at: i64,

    /// Source kind.
    pub origin: Origin,

    /// Canonical URL, if any.
    pub url: Option<String>,

    /// Full document text.
    pub content: String,

    /// Unix timestamp when the document was stored (set by storage).
    pub ingested_at: Option<i64>,

    /// Author handle or name.
    pub author: String,

    /// SHA-256 hex digest of `content`.
    pub checksum: String,
}

impl Doc {
    /// Creates a document, deriving its ID and content checksum.
    #[must_use]
    pub fn new(origin: Origin, external_id: &str, author: &str, content: String) -> Self {
        Self {
            id: Self::derive_id(origin, external_id),
            external_id: external_id.to_string(),
            created_at: current_timestamp(),
            origin,
            url: None,
            checksum: checksum(&content),
            content,
            ingested_at: None,
            author: author.to_string(),
        }
    }

    /// Derives the document ID: the first 32 hex digits of
    /// `sha256("{origin}:{external_id}")`.
    #[must_use]
    pub fn derive_id(origin: Origin, external_id: &str) -> String {
        let digest = Sha256::digest(format!("{origin}:{external_id}").as_bytes());
        hex::encode(&digest[..16])
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Sets the source creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Returns the content length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Returns the SHA-256 hex digest of `content`.
#[must_use]
pub fn checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[allow(clippy::cast_possible_wrap)]
pub(crate) fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_new() {
        let doc = Doc::new(
            Origin::CommunityArchive,
            "1234567890",
            "someone",
            "A thread".to_string(),
        );
        assert_eq!(doc.external_id, "1234567890");
        assert_eq!(doc.author, "someone");
        assert_eq!(doc.origin, Origin::CommunityArchive);
        assert!(doc.url.is_none());
        assert!(doc.ingested_at.is_none());
        assert!(doc.created_at > 0);
        assert_eq!(doc.id.len(), 32);
    }

    #[test]
    fn test_doc_id_is_stable() {
        let a = Doc::derive_id(Origin::Rss, "guid-1");
        let b = Doc::derive_id(Origin::Rss, "guid-1");
        let c = Doc::derive_id(Origin::File, "guid-1");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_checksum_known_value() {
        assert_eq!(
            checksum(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_doc_builders() {
        let doc = Doc::new(Origin::Rss, "e", "a", "héllo".to_string())
            .with_url(Some("https://example.com/e".to_string()))
            .with_created_at(1_700_000_000);
        assert_eq!(doc.url.as_deref(), Some("https://example.com/e"));
        assert_eq!(doc.created_at, 1_700_000_000);
        assert_eq!(doc.char_len(), 5);
    }

    #[test]
    fn test_origin_round_trip() {
        for origin in [Origin::CommunityArchive, Origin::Rss, Origin::File] {
            assert_eq!(origin.as_str().parse::<Origin>().unwrap(), origin);
        }
        assert_eq!("FEED".parse::<Origin>().unwrap(), Origin::Rss);
        assert!("gopher".parse::<Origin>().is_err());
    }

    #[test]
    fn test_origin_serde_name() {
        let json = serde_json::to_string(&Origin::CommunityArchive).unwrap();
        assert_eq!(json, "\"community-archive\"");
    }
}
