//! Category membership computation.
//!
//! Categories are a loose, tag-driven grouping overlay rather than a strict
//! hierarchy: a bookmark belongs to a category when it is filed there
//! directly, or when it shares at least one tag with it.

use std::collections::HashSet;

use crate::types::bookmark::Bookmark;
use crate::types::category::Category;
use crate::types::tag::Tag;

/// Returns the bookmarks belonging to `category`: direct members first, then
/// tag-overlap members.
///
/// A direct member is excluded from the tag pass, so no bookmark appears
/// twice. Beyond direct-before-tag, ordering is not guaranteed; callers
/// needing a stable order must sort after retrieval.
pub fn category_members<'a>(category: &Category, bookmarks: &'a [Bookmark]) -> Vec<&'a Bookmark> {
    let mut members: Vec<&Bookmark> = bookmarks
        .iter()
        .filter(|b| b.category_id.as_deref() == Some(category.id.as_str()))
        .collect();

    // Tag matching only applies when the category carries tags at all.
    if !category.tags.is_empty() {
        let tag_ids: HashSet<&str> = category.tags.iter().map(|t| t.id.as_str()).collect();
        let tag_names: HashSet<String> =
            category.tags.iter().map(|t| t.name.to_lowercase()).collect();

        members.extend(bookmarks.iter().filter(|b| {
            b.category_id.as_deref() != Some(category.id.as_str())
                && shares_tag(&b.tags, &tag_ids, &tag_names)
        }));
    }

    members
}

/// Id match first; the case-insensitive name match covers tags that arrived
/// as bare name strings and were assigned local ids during normalization.
fn shares_tag(tags: &[Tag], ids: &HashSet<&str>, names: &HashSet<String>) -> bool {
    tags.iter()
        .any(|t| ids.contains(t.id.as_str()) || names.contains(&t.name.to_lowercase()))
}
