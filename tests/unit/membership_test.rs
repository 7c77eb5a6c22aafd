//! Unit tests for the category-membership computation.

use linkstash::services::membership::category_members;
use linkstash::types::bookmark::Bookmark;
use linkstash::types::category::Category;
use linkstash::types::tag::Tag;

fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_string(),
        name: name.to_string(),
        owner_id: "u1".to_string(),
    }
}

fn bookmark(id: &str, category_id: Option<&str>, tags: Vec<Tag>) -> Bookmark {
    Bookmark {
        id: id.to_string(),
        title: format!("bookmark {}", id),
        url: "https://example.com".to_string(),
        description: None,
        category_id: category_id.map(str::to_string),
        tags,
        is_favorite: false,
        owner_id: "u1".to_string(),
        created_at: 0,
        updated_at: 0,
        integrated: false,
    }
}

fn category(id: &str, tags: Vec<Tag>) -> Category {
    Category {
        id: id.to_string(),
        title: format!("category {}", id),
        tags,
        is_public: false,
        owner_id: "u1".to_string(),
        created_at: 0,
        updated_at: 0,
    }
}

/// A private category with one tag picks up an unfiled bookmark that shares
/// the tag by id.
#[test]
fn test_tag_only_membership() {
    let cat = category("c1", vec![tag("t1", "news")]);
    let bookmarks = vec![bookmark("b1", None, vec![tag("t1", "news")])];

    let members = category_members(&cat, &bookmarks);
    let ids: Vec<&str> = members.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b1"]);
}

#[test]
fn test_membership_iff_direct_or_overlap() {
    let cat = category("c1", vec![tag("t1", "news"), tag("t2", "tech")]);
    let bookmarks = vec![
        bookmark("direct", Some("c1"), vec![]),
        bookmark("overlap-id", None, vec![tag("t2", "tech")]),
        bookmark("overlap-name", None, vec![tag("other-id", "News")]),
        bookmark("elsewhere", Some("c2"), vec![tag("t9", "sports")]),
        bookmark("untagged", None, vec![]),
    ];

    let members = category_members(&cat, &bookmarks);
    let ids: Vec<&str> = members.iter().map(|b| b.id.as_str()).collect();
    assert!(ids.contains(&"direct"));
    assert!(ids.contains(&"overlap-id"));
    assert!(ids.contains(&"overlap-name"));
    assert!(!ids.contains(&"elsewhere"));
    assert!(!ids.contains(&"untagged"));
}

#[test]
fn test_no_bookmark_counted_twice() {
    let cat = category("c1", vec![tag("t1", "news")]);
    let bookmarks = vec![
        bookmark("both", Some("c1"), vec![tag("t1", "news")]),
        bookmark("tagged", None, vec![tag("t1", "news")]),
    ];

    let members = category_members(&cat, &bookmarks);
    assert_eq!(members.len(), 2);
    let mut ids: Vec<&str> = members.iter().map(|b| b.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 2);
}

/// A bookmark filed in a different category can still be a tag member here:
/// the direct link is a soft reference, not exclusive containment.
#[test]
fn test_foreign_direct_link_does_not_block_tag_match() {
    let cat = category("c1", vec![tag("t1", "news")]);
    let bookmarks = vec![bookmark("b1", Some("c2"), vec![tag("t1", "news")])];
    assert_eq!(category_members(&cat, &bookmarks).len(), 1);
}

#[test]
fn test_empty_inputs() {
    let cat = category("c1", vec![tag("t1", "news")]);
    assert!(category_members(&cat, &[]).is_empty());

    let untagged = category("c2", vec![]);
    let bookmarks = vec![bookmark("b1", None, vec![tag("t1", "news")])];
    assert!(category_members(&untagged, &bookmarks).is_empty());
}
