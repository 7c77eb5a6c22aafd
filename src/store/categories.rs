//! Category operations of the local cache store.
//!
//! Categories follow the optimistic write policy: when the backend rejects
//! or never answers a write, the change is applied to local state anyway so
//! organizing is never blocked by transient server trouble.

use uuid::Uuid;

use crate::api::dto::{CategoryPatch, CategoryRequest};
use crate::api::gateway::RemoteGateway;
use crate::services::membership;
use crate::types::bookmark::Bookmark;
use crate::types::category::{Category, CategoryUpdate, NewCategory};
use crate::types::errors::StoreError;

use super::{Store, CATEGORY_WRITE_POLICY};

impl<G: RemoteGateway> Store<G> {
    /// Creates a category through the backend. On remote failure the
    /// category is stored anyway under a locally scoped id.
    pub async fn add_category(&mut self, new: NewCategory) -> Result<Category, StoreError> {
        let user = self.require_user()?;

        let request = CategoryRequest {
            title: new.title.clone(),
            is_public: new.is_public,
            tag_names: new.tags.iter().map(|t| t.name.clone()).collect(),
        };

        let category = match self.gateway.create_category(&request).await {
            Ok(dto) => dto.into_category(&user.id),
            Err(e) => {
                CATEGORY_WRITE_POLICY.absorb(e, "category")?;
                let now = Self::now();
                Category {
                    id: Uuid::new_v4().to_string(),
                    title: new.title,
                    tags: new.tags,
                    is_public: new.is_public,
                    owner_id: user.id.clone(),
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        self.categories.push(category.clone());
        self.persist();
        Ok(category)
    }

    /// Applies a partial update, owner-only. On remote success the response's
    /// tag set is authoritative; on remote failure the partial is applied
    /// locally anyway.
    pub async fn update_category(
        &mut self,
        id: &str,
        update: CategoryUpdate,
    ) -> Result<Category, StoreError> {
        let user = self.require_user()?;
        let index = self.owned_category_index(id, &user)?;

        let patch = CategoryPatch {
            title: update.title.clone(),
            is_public: update.is_public,
            tag_names: update
                .tags
                .as_ref()
                .map(|tags| tags.iter().map(|t| t.name.clone()).collect()),
        };

        let remote_tags = match self.gateway.update_category(id, &patch).await {
            Ok(dto) => {
                let refs = dto.tag_refs();
                if refs.is_empty() && update.tags.is_none() {
                    None
                } else {
                    Some(crate::api::dto::normalize_tags(refs, &user.id))
                }
            }
            Err(e) => {
                CATEGORY_WRITE_POLICY.absorb(e, "category")?;
                None
            }
        };

        let category = &mut self.categories[index];
        if let Some(title) = update.title {
            category.title = title;
        }
        if let Some(is_public) = update.is_public {
            category.is_public = is_public;
        }
        match remote_tags {
            Some(tags) => category.tags = tags,
            None => {
                if let Some(tags) = update.tags {
                    category.tags = tags;
                }
            }
        }
        category.updated_at = Self::now();

        let updated = category.clone();
        self.persist();
        Ok(updated)
    }

    /// Deletes a category, owner-only. Member bookmarks keep their soft link;
    /// the backend clears it server-side and the next bulk load reflects
    /// that. Local removal proceeds even when the remote call fails.
    pub async fn delete_category(&mut self, id: &str) -> Result<(), StoreError> {
        let user = self.require_user()?;
        self.owned_category_index(id, &user)?;

        if let Err(e) = self.gateway.delete_category(id).await {
            tracing::warn!("remote category delete failed, removing locally: {}", e);
        }

        self.categories.retain(|c| c.id != id);
        self.persist();
        Ok(())
    }

    /// Flips the public flag, owner-only. Returns the new value.
    pub async fn toggle_category_visibility(&mut self, id: &str) -> Result<bool, StoreError> {
        let user = self.require_user()?;
        let index = self.owned_category_index(id, &user)?;

        if let Err(e) = self.gateway.toggle_category_visibility(id).await {
            CATEGORY_WRITE_POLICY.absorb(e, "category")?;
        }

        let category = &mut self.categories[index];
        category.is_public = !category.is_public;
        let value = category.is_public;
        self.persist();
        Ok(value)
    }

    /// Duplicates a category under a fresh identity owned by the current
    /// user. Copies are always private regardless of the source visibility.
    pub async fn copy_category(
        &mut self,
        id: &str,
        with_new_title: bool,
    ) -> Result<Category, StoreError> {
        let original = self
            .categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?
            .clone();

        let title = if with_new_title {
            format!("{} (copy)", original.title)
        } else {
            original.title
        };

        self.add_category(NewCategory {
            title,
            is_public: false,
            tags: original.tags,
        })
        .await
    }

    /// Replaces the local category collection with the backend's, normalized.
    pub async fn load_user_categories(&mut self) -> Result<Vec<Category>, StoreError> {
        let user = self.require_user()?;
        let dtos = self.gateway.fetch_categories().await?;
        let categories: Vec<Category> = dtos
            .into_iter()
            .map(|dto| dto.into_category(&user.id))
            .collect();
        self.categories = categories.clone();
        self.persist();
        Ok(categories)
    }

    /// Computes the bookmarks belonging to a category: direct members plus
    /// tag-overlap members. Unknown category ids yield an empty list.
    pub fn category_bookmarks(&self, category_id: &str) -> Vec<Bookmark> {
        let Some(category) = self.categories.iter().find(|c| c.id == category_id) else {
            tracing::debug!("category {} not found locally", category_id);
            return Vec::new();
        };
        membership::category_members(category, &self.bookmarks)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::mock::MockGateway;
    use crate::storage::MemoryStorage;
    use crate::store::Store;
    use crate::types::bookmark::NewBookmark;
    use crate::types::category::{CategoryUpdate, NewCategory};
    use crate::types::errors::StoreError;
    use crate::types::tag::Tag;

    async fn logged_in_store() -> (
        Store<MockGateway>,
        Arc<std::sync::Mutex<crate::api::mock::MockState>>,
    ) {
        let (gateway, remote) = MockGateway::new();
        let mut store = Store::new(gateway, Arc::new(MemoryStorage::new()));
        store.login("tester@example.com", "pw").await.unwrap();
        (store, remote)
    }

    fn tag(name: &str) -> Tag {
        Tag {
            id: format!("t-{}", name),
            name: name.to_string(),
            owner_id: "u1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_category_uses_server_identity() {
        let (mut store, remote) = logged_in_store().await;

        let category = store
            .add_category(NewCategory {
                title: "News".to_string(),
                is_public: true,
                tags: vec![tag("daily")],
            })
            .await
            .unwrap();

        assert!(category.id.starts_with("c-"));
        assert!(category.is_public);
        assert_eq!(category.tags[0].id, "t-daily");
        assert_eq!(store.user_categories().len(), 1);
        assert_eq!(remote.lock().unwrap().created_categories.len(), 1);
    }

    #[tokio::test]
    async fn test_add_category_degrades_to_local_write() {
        let (mut store, remote) = logged_in_store().await;
        remote.lock().unwrap().fail_category_writes = true;

        let category = store
            .add_category(NewCategory {
                title: "Offline".to_string(),
                is_public: false,
                tags: vec![tag("later")],
            })
            .await
            .unwrap();

        // Stored anyway, under a locally scoped id.
        assert!(!category.id.starts_with("c-"));
        assert_eq!(store.user_categories().len(), 1);
        assert_eq!(store.user_categories()[0].title, "Offline");
    }

    #[tokio::test]
    async fn test_update_category_applies_partial_on_remote_failure() {
        let (mut store, remote) = logged_in_store().await;
        let category = store
            .add_category(NewCategory {
                title: "Before".to_string(),
                is_public: false,
                tags: vec![],
            })
            .await
            .unwrap();

        remote.lock().unwrap().fail_category_writes = true;
        let updated = store
            .update_category(
                &category.id,
                CategoryUpdate {
                    title: Some("After".to_string()),
                    tags: Some(vec![tag("added")]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_update_category_adopts_server_tags() {
        let (mut store, _remote) = logged_in_store().await;
        let category = store
            .add_category(NewCategory {
                title: "C".to_string(),
                is_public: false,
                tags: vec![],
            })
            .await
            .unwrap();

        let updated = store
            .update_category(
                &category.id,
                CategoryUpdate {
                    tags: Some(vec![tag("Server")]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The mock echoes ids derived from the name, standing in for the
        // server's authoritative tag rows.
        assert_eq!(updated.tags[0].id, "t-server");
    }

    #[tokio::test]
    async fn test_update_category_rejects_non_owner() {
        let (mut store, _remote) = logged_in_store().await;
        store.categories.push(crate::types::category::Category {
            id: "foreign-c".to_string(),
            title: "Theirs".to_string(),
            tags: vec![],
            is_public: true,
            owner_id: "someone-else".to_string(),
            created_at: 0,
            updated_at: 0,
        });

        let result = store
            .update_category(
                "foreign-c",
                CategoryUpdate {
                    title: Some("Taken".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotOwner(_))));
    }

    #[tokio::test]
    async fn test_delete_category_removes_locally_and_remotely() {
        let (mut store, remote) = logged_in_store().await;
        let category = store
            .add_category(NewCategory {
                title: "Done".to_string(),
                is_public: false,
                tags: vec![],
            })
            .await
            .unwrap();

        store.delete_category(&category.id).await.unwrap();
        assert!(store.user_categories().is_empty());
        assert_eq!(
            remote.lock().unwrap().deleted_categories,
            vec![category.id]
        );
    }

    #[tokio::test]
    async fn test_delete_category_settles_locally_on_remote_failure() {
        let (mut store, remote) = logged_in_store().await;
        let category = store
            .add_category(NewCategory {
                title: "Doomed".to_string(),
                is_public: false,
                tags: vec![],
            })
            .await
            .unwrap();

        remote.lock().unwrap().fail_category_writes = true;
        store.delete_category(&category.id).await.unwrap();
        assert!(store.user_categories().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_visibility_flips_flag() {
        let (mut store, _remote) = logged_in_store().await;
        let category = store
            .add_category(NewCategory {
                title: "V".to_string(),
                is_public: false,
                tags: vec![],
            })
            .await
            .unwrap();

        assert!(store.toggle_category_visibility(&category.id).await.unwrap());
        assert!(!store.toggle_category_visibility(&category.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_category_is_private_with_suffix() {
        let (mut store, _remote) = logged_in_store().await;
        let original = store
            .add_category(NewCategory {
                title: "Public stuff".to_string(),
                is_public: true,
                tags: vec![tag("shared")],
            })
            .await
            .unwrap();

        let copy = store.copy_category(&original.id, true).await.unwrap();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.title, "Public stuff (copy)");
        assert!(!copy.is_public);
        assert_eq!(copy.tags.len(), 1);
    }

    #[tokio::test]
    async fn test_category_bookmarks_combines_direct_and_tagged() {
        let (mut store, _remote) = logged_in_store().await;
        let category = store
            .add_category(NewCategory {
                title: "News".to_string(),
                is_public: false,
                tags: vec![tag("news")],
            })
            .await
            .unwrap();

        store
            .add_bookmark(NewBookmark {
                title: "Direct".to_string(),
                url: "https://direct.example".to_string(),
                category_id: Some(category.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .add_bookmark(NewBookmark {
                title: "Tagged".to_string(),
                url: "https://tagged.example".to_string(),
                tags: vec![tag("news")],
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .add_bookmark(NewBookmark {
                title: "Unrelated".to_string(),
                url: "https://other.example".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let members = store.category_bookmarks(&category.id);
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].title, "Direct");
        assert_eq!(members[1].title, "Tagged");
    }

    #[tokio::test]
    async fn test_category_bookmarks_unknown_id_is_empty() {
        let (store, _remote) = logged_in_store().await;
        assert!(store.category_bookmarks("nope").is_empty());
    }
}
