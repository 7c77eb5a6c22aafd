use serde::{Deserialize, Serialize};

use super::tag::Tag;

/// A tag-driven grouping of bookmarks.
///
/// A category never enumerates its members; membership is computed from the
/// direct `category_id` link on bookmarks plus tag overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub tags: Vec<Tag>,
    pub is_public: bool,
    pub owner_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a category.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub title: String,
    pub is_public: bool,
    pub tags: Vec<Tag>,
}

/// Partial update for a category. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub title: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<Tag>>,
}
