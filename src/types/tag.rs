use serde::{Deserialize, Serialize};

/// A user-owned label attached to bookmarks and categories.
///
/// Tag names are unique per owner, compared case-insensitively. Tags are
/// created on demand: explicitly, or implicitly while importing shared
/// content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

impl Tag {
    /// Case-insensitive name comparison, used for per-owner dedup and the
    /// name-fallback membership match.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}
