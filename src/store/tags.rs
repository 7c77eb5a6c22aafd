//! Tag operations of the local cache store.
//!
//! Tags follow the optimistic write policy. Deletion cascades: a removed
//! tag disappears from every bookmark's and category's tag set in the same
//! transition.

use uuid::Uuid;

use crate::api::gateway::RemoteGateway;
use crate::types::errors::StoreError;
use crate::types::tag::Tag;

use super::{Store, TAG_WRITE_POLICY};

impl<G: RemoteGateway> Store<G> {
    /// Creates a tag through the backend. On remote failure the tag is
    /// stored anyway under a locally scoped id.
    ///
    /// This is the raw create; deduplicating callers go through
    /// [`Store::find_or_create_tag`].
    pub async fn add_tag(&mut self, name: &str) -> Result<Tag, StoreError> {
        let user = self.require_user()?;

        let tag = match self.gateway.create_tag(name).await {
            Ok(dto) => dto.into_tag(&user.id),
            Err(e) => {
                TAG_WRITE_POLICY.absorb(e, "tag")?;
                Tag {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    owner_id: user.id.clone(),
                }
            }
        };

        self.tags.push(tag.clone());
        self.persist();
        Ok(tag)
    }

    /// Returns the current user's tag with the given name, matched
    /// case-insensitively, creating it when absent.
    ///
    /// Every import and copy path resolves tags through here — never through
    /// the raw create — so repeated imports cannot accumulate duplicate tag
    /// rows that differ only in identity or casing.
    pub async fn find_or_create_tag(&mut self, name: &str) -> Result<Tag, StoreError> {
        let user = self.require_user()?;

        if let Some(existing) = self
            .tags
            .iter()
            .find(|t| t.owner_id == user.id && t.name_matches(name))
        {
            return Ok(existing.clone());
        }

        self.add_tag(name).await
    }

    /// Renames a tag, owner-only. The new name is applied everywhere the tag
    /// appears.
    pub async fn rename_tag(&mut self, id: &str, name: &str) -> Result<Tag, StoreError> {
        let user = self.require_user()?;
        let index = self
            .tags
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if self.tags[index].owner_id != user.id {
            return Err(StoreError::NotOwner(id.to_string()));
        }

        if let Err(e) = self.gateway.update_tag(id, name).await {
            TAG_WRITE_POLICY.absorb(e, "tag")?;
        }

        self.tags[index].name = name.to_string();
        for bookmark in &mut self.bookmarks {
            for tag in &mut bookmark.tags {
                if tag.id == id {
                    tag.name = name.to_string();
                }
            }
        }
        for category in &mut self.categories {
            for tag in &mut category.tags {
                if tag.id == id {
                    tag.name = name.to_string();
                }
            }
        }

        let renamed = self.tags[index].clone();
        self.persist();
        Ok(renamed)
    }

    /// Deletes a tag, owner-only, cascading into every bookmark's and
    /// category's tag set. Local removal proceeds even when the remote call
    /// fails.
    pub async fn delete_tag(&mut self, id: &str) -> Result<(), StoreError> {
        let user = self.require_user()?;
        let tag = self
            .tags
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if tag.owner_id != user.id {
            return Err(StoreError::NotOwner(id.to_string()));
        }

        if let Err(e) = self.gateway.delete_tag(id).await {
            tracing::warn!("remote tag delete failed, removing locally: {}", e);
        }

        self.tags.retain(|t| t.id != id);
        for bookmark in &mut self.bookmarks {
            bookmark.tags.retain(|t| t.id != id);
        }
        for category in &mut self.categories {
            category.tags.retain(|t| t.id != id);
        }
        self.persist();
        Ok(())
    }

    /// Replaces the local tag collection with the backend's.
    pub async fn load_user_tags(&mut self) -> Result<Vec<Tag>, StoreError> {
        let user = self.require_user()?;
        let dtos = self.gateway.fetch_tags().await?;
        let tags: Vec<Tag> = dtos
            .into_iter()
            .map(|dto| dto.into_tag(&user.id))
            .collect();
        self.tags = tags.clone();
        self.persist();
        Ok(tags)
    }
}
