//! Property-based tests for the category-membership computation.
//!
//! For any category C and bookmark set, a bookmark B is a member of C
//! exactly when it is filed there directly or shares at least one tag with
//! C — and it is never counted twice.

use std::collections::HashSet;

use linkstash::services::membership::category_members;
use linkstash::types::bookmark::Bookmark;
use linkstash::types::category::Category;
use linkstash::types::tag::Tag;
use proptest::prelude::*;

/// Strategy for a small pool of tag names; overlap between category and
/// bookmark tags has to be likely for the test to exercise the tag pass.
fn arb_tag() -> impl Strategy<Value = Tag> {
    (0u8..6).prop_map(|n| Tag {
        id: format!("t{}", n),
        name: format!("name{}", n),
        owner_id: "u1".to_string(),
    })
}

fn arb_bookmark(index: usize) -> impl Strategy<Value = Bookmark> {
    (
        proptest::option::of(0u8..3),
        proptest::collection::vec(arb_tag(), 0..4),
    )
        .prop_map(move |(category, tags)| Bookmark {
            id: format!("b{}", index),
            title: format!("bookmark {}", index),
            url: "https://example.com".to_string(),
            description: None,
            category_id: category.map(|c| format!("c{}", c)),
            tags,
            is_favorite: false,
            owner_id: "u1".to_string(),
            created_at: 0,
            updated_at: 0,
            integrated: false,
        })
}

fn arb_bookmarks() -> impl Strategy<Value = Vec<Bookmark>> {
    (0usize..12).prop_flat_map(|len| {
        let strategies: Vec<_> = (0..len).map(arb_bookmark).collect();
        strategies
    })
}

fn arb_category() -> impl Strategy<Value = Category> {
    proptest::collection::vec(arb_tag(), 0..4).prop_map(|tags| Category {
        id: "c0".to_string(),
        title: "category".to_string(),
        tags,
        is_public: false,
        owner_id: "u1".to_string(),
        created_at: 0,
        updated_at: 0,
    })
}

/// Reference predicate: direct link, or (category tagged and some tag shared
/// by id or case-insensitive name).
fn is_member(category: &Category, bookmark: &Bookmark) -> bool {
    if bookmark.category_id.as_deref() == Some(category.id.as_str()) {
        return true;
    }
    if category.tags.is_empty() {
        return false;
    }
    let ids: HashSet<&str> = category.tags.iter().map(|t| t.id.as_str()).collect();
    let names: HashSet<String> = category.tags.iter().map(|t| t.name.to_lowercase()).collect();
    bookmark
        .tags
        .iter()
        .any(|t| ids.contains(t.id.as_str()) || names.contains(&t.name.to_lowercase()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn membership_matches_characterization(
        category in arb_category(),
        bookmarks in arb_bookmarks(),
    ) {
        let members = category_members(&category, &bookmarks);
        let member_ids: HashSet<&str> = members.iter().map(|b| b.id.as_str()).collect();

        // No bookmark appears twice
        prop_assert_eq!(member_ids.len(), members.len(), "duplicate members returned");

        // Exactly the bookmarks satisfying the predicate are returned
        for bookmark in &bookmarks {
            prop_assert_eq!(
                member_ids.contains(bookmark.id.as_str()),
                is_member(&category, bookmark),
                "membership mismatch for {}", bookmark.id
            );
        }
    }

    #[test]
    fn direct_members_precede_tag_members(
        category in arb_category(),
        bookmarks in arb_bookmarks(),
    ) {
        let members = category_members(&category, &bookmarks);
        let first_tag_member = members
            .iter()
            .position(|b| b.category_id.as_deref() != Some(category.id.as_str()));
        if let Some(boundary) = first_tag_member {
            for member in &members[boundary..] {
                prop_assert_ne!(
                    member.category_id.as_deref(),
                    Some(category.id.as_str()),
                    "direct member found after a tag member"
                );
            }
        }
    }
}
