//! Knowledge sources attached to a draft.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A knowledge-base item.
///
/// Nothing is actually ingested, so `processed` is set as soon as the
/// record is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub id: Uuid,
    pub kind: SourceKind,
    pub added_at: Timestamp,
    pub processed: bool,
}

/// What the source points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceKind {
    /// An uploaded document.
    #[serde(rename_all = "camelCase")]
    File { name: String, size_bytes: u64 },

    /// A web page.
    Url { url: String },
}

impl SourceRecord {
    pub fn file(name: impl Into<String>, size_bytes: u64, added_at: Timestamp) -> Self {
        Self::new(
            SourceKind::File {
                name: name.into(),
                size_bytes,
            },
            added_at,
        )
    }

    pub fn url(url: impl Into<String>, added_at: Timestamp) -> Self {
        Self::new(SourceKind::Url { url: url.into() }, added_at)
    }

    fn new(kind: SourceKind, added_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            added_at,
            processed: true,
        }
    }

    /// File name or URL, for listings.
    pub fn display_name(&self) -> &str {
        match &self.kind {
            SourceKind::File { name, .. } => name,
            SourceKind::Url { url } => url,
        }
    }
}
