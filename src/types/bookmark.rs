use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// A saved link owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// Soft link to a category owned by the same user. Membership can also
    /// arise purely from tag overlap, so this may stay `None` forever.
    pub category_id: Option<String>,
    pub tags: Vec<Tag>,
    pub is_favorite: bool,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Surfaced from a cross-account search rather than the viewer's own
    /// collection; read-mostly.
    pub integrated: bool,
}

/// Input for creating a bookmark. Identity, ownership, and timestamps are
/// assigned during creation.
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub tags: Vec<Tag>,
    pub integrated: bool,
}

/// Partial update for a bookmark. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct BookmarkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    /// `Some(None)` clears the category link.
    pub category_id: Option<Option<String>>,
    pub tags: Option<Vec<Tag>>,
}

/// One entry of the recently-viewed list.
///
/// The list is bounded, most-recent-first, and unique by bookmark id;
/// re-viewing a bookmark moves its entry to the front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentView {
    pub id: String,
    pub bookmark_id: String,
    pub viewed_at: i64,
}
