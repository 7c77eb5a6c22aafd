use serde::{Deserialize, Serialize};

use super::bookmark::Bookmark;

/// What a share link points at. Exactly one target per link, by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareTarget {
    Bookmark(String),
    Category(String),
}

/// A bearer-style capability: anyone holding the token may read the
/// referenced content, and an authenticated viewer may import it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLink {
    pub id: String,
    pub token: String,
    pub target: ShareTarget,
    pub created_at: i64,
}

/// A shared category as presented to a viewer, regardless of whether it was
/// materialized server-side or assembled from local state.
#[derive(Debug, Clone)]
pub struct SharedCategory {
    pub id: String,
    pub title: String,
    pub tag_names: Vec<String>,
    pub bookmarks: Vec<Bookmark>,
}

/// Terminal states of share-token resolution.
///
/// Resolution starts implicitly in a resolving state and always lands on one
/// of these; it never panics and never surfaces a transport error directly.
#[derive(Debug, Clone)]
pub enum ShareResolution {
    Bookmark(Bookmark),
    Category(SharedCategory),
    NotFound,
    Failed(String),
}

/// Outcome of requesting a share link for a category.
///
/// Sharing a private category makes otherwise-private content reachable by
/// anyone with the link, so it requires an explicit confirmation step before
/// any token is generated.
#[derive(Debug, Clone)]
pub enum ShareGate {
    Ready(ShareLink),
    ConfirmationRequired,
}

/// Per-bookmark failure captured during a category import.
#[derive(Debug, Clone)]
pub struct ImportFailure {
    pub title: String,
    pub reason: String,
}

/// Result of a category import. Individual clone failures are recorded here
/// rather than aborting the import.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub category_id: String,
    pub imported: Vec<Bookmark>,
    pub failed: Vec<ImportFailure>,
}
