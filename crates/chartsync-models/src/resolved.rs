use serde::{Deserialize, Serialize};

use crate::media::MediaType;

/// One catalog search result, kept only long enough to pick a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCandidate {
    pub media_type: MediaType,
    pub trakt_id: u64,
    pub title: String,
    pub slug: String,
}

/// A chart row resolved to its canonical catalog identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub media_type: MediaType,
    pub trakt_id: u64,
    pub rank: u32,
}
