//! Wire representations of the bookmark service REST API.
//!
//! The backend is inconsistent about tag relations: depending on the
//! endpoint (and server version) they arrive as `tags: [{id,name}]`,
//! `tagNames: ["name"]`, or `tagNames: [{id,name}]`. That ambiguity is
//! resolved here, once, and never leaks past this module.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::bookmark::Bookmark;
use crate::types::category::Category;
use crate::types::tag::Tag;

/// A tag relation as it appears on the wire: either a full object or a bare
/// name string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagRef {
    Full { id: String, name: String },
    Name(String),
}

impl TagRef {
    /// Normalizes into the local tag shape. Name-only payloads get a
    /// locally scoped id; the name-fallback membership match covers them.
    pub fn into_tag(self, owner_id: &str) -> Tag {
        match self {
            TagRef::Full { id, name } => Tag {
                id,
                name,
                owner_id: owner_id.to_string(),
            },
            TagRef::Name(name) => Tag {
                id: format!("tag-{}", Uuid::new_v4()),
                name,
                owner_id: owner_id.to_string(),
            },
        }
    }
}

/// Normalizes a wire tag list into local tags owned by `owner_id`.
pub fn normalize_tags(refs: Vec<TagRef>, owner_id: &str) -> Vec<Tag> {
    refs.into_iter().map(|r| r.into_tag(owner_id)).collect()
}

// === Auth ===

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

// === Bookmarks ===

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub tag_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(None)` serializes as an explicit null, clearing the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkDto {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<TagRef>>,
    #[serde(default)]
    pub tag_names: Option<Vec<TagRef>>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl BookmarkDto {
    /// Tag relations regardless of which field the server chose.
    pub fn tag_refs(&self) -> Vec<TagRef> {
        self.tags
            .clone()
            .or_else(|| self.tag_names.clone())
            .unwrap_or_default()
    }

    /// Maps the wire shape into a local bookmark owned by `owner_id`.
    pub fn into_bookmark(self, owner_id: &str) -> Bookmark {
        let tags = normalize_tags(self.tag_refs(), owner_id);
        let updated_at = if self.updated_at != 0 {
            self.updated_at
        } else {
            self.created_at
        };
        Bookmark {
            id: self.id,
            title: self.title,
            url: self.url,
            description: self.description,
            category_id: self.category_id,
            tags,
            is_favorite: self.is_favorite,
            owner_id: owner_id.to_string(),
            created_at: self.created_at,
            updated_at,
            integrated: false,
        }
    }
}

// === Categories ===

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub title: String,
    pub is_public: bool,
    pub tag_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Option<Vec<TagRef>>,
    #[serde(default)]
    pub tag_names: Option<Vec<TagRef>>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl CategoryDto {
    /// Tag relations regardless of which field the server chose.
    pub fn tag_refs(&self) -> Vec<TagRef> {
        self.tags
            .clone()
            .or_else(|| self.tag_names.clone())
            .unwrap_or_default()
    }

    /// Maps the wire shape into a local category owned by `owner_id`.
    pub fn into_category(self, owner_id: &str) -> Category {
        let tags = normalize_tags(self.tag_refs(), owner_id);
        let updated_at = if self.updated_at != 0 {
            self.updated_at
        } else {
            self.created_at
        };
        Category {
            id: self.id,
            title: self.title,
            tags,
            is_public: self.is_public,
            owner_id: owner_id.to_string(),
            created_at: self.created_at,
            updated_at,
        }
    }
}

/// Payload of the shared-category endpoint: the server materializes the
/// member bookmarks itself, so this is authoritative as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedCategoryDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tag_names: Vec<String>,
    #[serde(default)]
    pub bookmarks: Vec<BookmarkDto>,
}

// === Tags ===

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: String,
    pub name: String,
}

impl TagDto {
    pub fn into_tag(self, owner_id: &str) -> Tag {
        Tag {
            id: self.id,
            name: self.name,
            owner_id: owner_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_ref_parses_full_object() {
        let refs: Vec<TagRef> =
            serde_json::from_str(r#"[{"id":"t1","name":"news"}]"#).unwrap();
        let tags = normalize_tags(refs, "u1");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id, "t1");
        assert_eq!(tags[0].name, "news");
        assert_eq!(tags[0].owner_id, "u1");
    }

    #[test]
    fn test_tag_ref_parses_bare_name() {
        let refs: Vec<TagRef> = serde_json::from_str(r#"["news","rust"]"#).unwrap();
        let tags = normalize_tags(refs, "u1");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "news");
        // Name-only payloads are assigned a locally scoped id
        assert!(tags[0].id.starts_with("tag-"));
    }

    #[test]
    fn test_bookmark_dto_prefers_tags_over_tag_names() {
        let json = r#"{
            "id": "b1", "title": "T", "url": "https://example.com",
            "tags": [{"id":"t1","name":"a"}],
            "tagNames": ["b"]
        }"#;
        let dto: BookmarkDto = serde_json::from_str(json).unwrap();
        let refs = dto.tag_refs();
        assert_eq!(refs.len(), 1);
        assert!(matches!(&refs[0], TagRef::Full { id, .. } if id == "t1"));
    }

    #[test]
    fn test_bookmark_dto_falls_back_to_tag_names_field() {
        let json = r#"{
            "id": "b1", "title": "T", "url": "https://example.com",
            "tagNames": [{"id":"t2","name":"b"}]
        }"#;
        let dto: BookmarkDto = serde_json::from_str(json).unwrap();
        let bookmark = dto.into_bookmark("u1");
        assert_eq!(bookmark.tags.len(), 1);
        assert_eq!(bookmark.tags[0].id, "t2");
        assert_eq!(bookmark.owner_id, "u1");
        assert!(!bookmark.integrated);
    }

    #[test]
    fn test_missing_updated_at_falls_back_to_created_at() {
        let json = r#"{
            "id": "b1", "title": "T", "url": "https://example.com",
            "createdAt": 1700000000
        }"#;
        let dto: BookmarkDto = serde_json::from_str(json).unwrap();
        let bookmark = dto.into_bookmark("u1");
        assert_eq!(bookmark.updated_at, 1700000000);
    }

    #[test]
    fn test_bookmark_patch_serializes_explicit_null_category() {
        let patch = BookmarkPatch {
            category_id: Some(None),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"categoryId":null}"#);
    }

    #[test]
    fn test_bookmark_patch_omits_untouched_fields() {
        let patch = BookmarkPatch {
            title: Some("New".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"title":"New"}"#);
    }
}
