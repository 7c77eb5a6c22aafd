//! Bookmark operations of the local cache store.
//!
//! Bookmarks follow the strict write policy: a failed remote create or
//! update propagates to the caller so the form can display it. Deletes
//! settle locally even when the backend call fails.

use crate::api::dto::{BookmarkPatch, BookmarkRequest};
use crate::api::gateway::RemoteGateway;
use crate::types::bookmark::{Bookmark, BookmarkUpdate, NewBookmark};
use crate::types::errors::StoreError;

use super::{Store, BOOKMARK_WRITE_POLICY};

impl<G: RemoteGateway> Store<G> {
    /// Creates a bookmark through the backend and appends the normalized
    /// result to the local collection. The new bookmark also lands at the
    /// front of the recent-view list.
    pub async fn add_bookmark(&mut self, new: NewBookmark) -> Result<Bookmark, StoreError> {
        let user = self.require_user()?;

        let request = BookmarkRequest {
            title: new.title.clone(),
            url: new.url.clone(),
            description: new.description.clone(),
            category_id: new.category_id.clone(),
            tag_names: new.tags.iter().map(|t| t.name.clone()).collect(),
        };

        let dto = match self.gateway.create_bookmark(&request).await {
            Ok(dto) => dto,
            Err(e) => {
                BOOKMARK_WRITE_POLICY.absorb(e, "bookmark")?;
                unreachable!("bookmark writes are strict");
            }
        };

        let mut bookmark = dto.into_bookmark(&user.id);
        bookmark.integrated = new.integrated;
        self.bookmarks.push(bookmark.clone());
        self.record_recent_view(&bookmark.id);
        self.persist();
        Ok(bookmark)
    }

    /// Applies a partial update. Only the owner may update; the tag set in
    /// the remote response is authoritative and replaces the local one.
    pub async fn update_bookmark(
        &mut self,
        id: &str,
        update: BookmarkUpdate,
    ) -> Result<Bookmark, StoreError> {
        let user = self.require_user()?;
        let index = self.owned_bookmark_index(id, &user)?;

        let patch = BookmarkPatch {
            title: update.title.clone(),
            url: update.url.clone(),
            description: update.description.clone(),
            category_id: update.category_id.clone(),
            tag_names: update
                .tags
                .as_ref()
                .map(|tags| tags.iter().map(|t| t.name.clone()).collect()),
        };

        let dto = match self.gateway.update_bookmark(id, &patch).await {
            Ok(dto) => dto,
            Err(e) => {
                BOOKMARK_WRITE_POLICY.absorb(e, "bookmark")?;
                unreachable!("bookmark writes are strict");
            }
        };

        let tag_refs = dto.tag_refs();
        let authoritative_tags = if update.tags.is_some() || !tag_refs.is_empty() {
            Some(crate::api::dto::normalize_tags(tag_refs, &user.id))
        } else {
            None
        };
        let remote_updated_at = dto.updated_at;

        let bookmark = &mut self.bookmarks[index];
        if let Some(title) = update.title {
            bookmark.title = title;
        }
        if let Some(url) = update.url {
            bookmark.url = url;
        }
        if let Some(description) = update.description {
            bookmark.description = Some(description);
        }
        if let Some(category_id) = update.category_id {
            bookmark.category_id = category_id;
        }
        if let Some(tags) = authoritative_tags {
            bookmark.tags = tags;
        }
        bookmark.updated_at = if remote_updated_at != 0 {
            remote_updated_at
        } else {
            Self::now()
        };

        let updated = bookmark.clone();
        self.persist();
        Ok(updated)
    }

    /// Deletes a bookmark. Only the owner may delete. Local removal proceeds
    /// even when the remote call fails — eventual consistency is preferred
    /// over strict consistency for deletes.
    pub async fn delete_bookmark(&mut self, id: &str) -> Result<(), StoreError> {
        let user = self.require_user()?;
        self.owned_bookmark_index(id, &user)?;

        if let Err(e) = self.gateway.delete_bookmark(id).await {
            tracing::warn!("remote bookmark delete failed, removing locally: {}", e);
        }

        self.bookmarks.retain(|b| b.id != id);
        self.recent_views.retain(|rv| rv.bookmark_id != id);
        self.persist();
        Ok(())
    }

    /// Flips the favorite flag, owner-only. Returns the new value.
    pub async fn toggle_favorite(&mut self, id: &str) -> Result<bool, StoreError> {
        let user = self.require_user()?;
        let index = self.owned_bookmark_index(id, &user)?;

        match self.gateway.toggle_favorite(id).await {
            Ok(()) => {}
            Err(e) => {
                BOOKMARK_WRITE_POLICY.absorb(e, "bookmark")?;
                unreachable!("bookmark writes are strict");
            }
        }

        let bookmark = &mut self.bookmarks[index];
        bookmark.is_favorite = !bookmark.is_favorite;
        let value = bookmark.is_favorite;
        self.persist();
        Ok(value)
    }

    /// Duplicates a bookmark's content under a fresh identity owned by the
    /// current user. Favorite state and timestamps are not preserved.
    pub async fn copy_bookmark(&mut self, id: &str) -> Result<Bookmark, StoreError> {
        let original = self
            .bookmarks
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .clone();

        self.add_bookmark(NewBookmark {
            title: original.title,
            url: original.url,
            description: original.description,
            category_id: original.category_id,
            tags: original.tags,
            integrated: original.integrated,
        })
        .await
    }

    /// Replaces the local bookmark collection with the backend's, normalized.
    pub async fn load_user_bookmarks(&mut self) -> Result<Vec<Bookmark>, StoreError> {
        let user = self.require_user()?;
        let dtos = self.gateway.fetch_bookmarks().await?;
        let bookmarks: Vec<Bookmark> = dtos
            .into_iter()
            .map(|dto| dto.into_bookmark(&user.id))
            .collect();
        self.bookmarks = bookmarks.clone();
        self.persist();
        Ok(bookmarks)
    }

    /// Fetches the user's favorited bookmarks. Ephemeral — the local
    /// collection is not touched.
    pub async fn load_favorite_bookmarks(&self) -> Result<Vec<Bookmark>, StoreError> {
        let user = self.require_user()?;
        let dtos = self.gateway.fetch_favorite_bookmarks().await?;
        Ok(dtos
            .into_iter()
            .map(|dto| dto.into_bookmark(&user.id))
            .collect())
    }

    /// Keyword search across the service. Results that are not part of the
    /// viewer's own collection are marked `integrated` (read-mostly) and are
    /// never merged into the store.
    pub async fn search_bookmarks(&self, keyword: &str) -> Result<Vec<Bookmark>, StoreError> {
        let user = self.require_user()?;
        let dtos = self.gateway.search_bookmarks(keyword).await?;
        Ok(dtos
            .into_iter()
            .map(|dto| {
                let own = self.bookmarks.iter().any(|b| b.id == dto.id);
                if own {
                    dto.into_bookmark(&user.id)
                } else {
                    let mut bookmark = dto.into_bookmark("");
                    bookmark.integrated = true;
                    bookmark
                }
            })
            .collect())
    }
}
