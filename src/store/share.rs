//! Share-link creation, resolution, and import.
//!
//! Resolution is remote-first: the backend's shared-category payload is
//! authoritative when it answers. The local share-link collection (and, as a
//! last resort, the persisted snapshot) covers links created on this device
//! while the backend is unreachable.

use futures::future::join_all;
use uuid::Uuid;

use crate::api::dto::BookmarkRequest;
use crate::api::gateway::RemoteGateway;
use crate::services::membership;
use crate::storage::SNAPSHOT_KEY;
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::category::NewCategory;
use crate::types::errors::StoreError;
use crate::types::share::{
    ImportFailure, ImportReport, ShareGate, ShareLink, ShareResolution, ShareTarget,
    SharedCategory,
};

use super::{Snapshot, Store};

impl<G: RemoteGateway> Store<G> {
    /// Creates a share link for a bookmark. Bookmark links are local
    /// capabilities; no backend token is involved.
    pub fn create_bookmark_share(&mut self, bookmark_id: &str) -> Result<ShareLink, StoreError> {
        if !self.bookmarks.iter().any(|b| b.id == bookmark_id) {
            return Err(StoreError::NotFound(bookmark_id.to_string()));
        }
        let link = self.push_link(
            Uuid::new_v4().to_string(),
            ShareTarget::Bookmark(bookmark_id.to_string()),
        );
        self.persist();
        Ok(link)
    }

    /// Requests a share link for a category.
    ///
    /// Sharing a private category exposes otherwise-private content to
    /// anyone holding the link, so the caller gets
    /// [`ShareGate::ConfirmationRequired`] and must come back through
    /// [`Store::confirm_category_share`]. Declining is simply never calling
    /// it: no remote call is made and no link exists. Public categories
    /// skip the gate.
    pub async fn request_category_share(
        &mut self,
        category_id: &str,
    ) -> Result<ShareGate, StoreError> {
        let category = self
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| StoreError::NotFound(category_id.to_string()))?;

        if !category.is_public {
            return Ok(ShareGate::ConfirmationRequired);
        }
        let link = self.generate_category_share(category_id).await;
        Ok(ShareGate::Ready(link))
    }

    /// Generates the share link after the user confirmed exposing a private
    /// category (or for a public one, unconditionally).
    pub async fn confirm_category_share(
        &mut self,
        category_id: &str,
    ) -> Result<ShareLink, StoreError> {
        if !self.categories.iter().any(|c| c.id == category_id) {
            return Err(StoreError::NotFound(category_id.to_string()));
        }
        Ok(self.generate_category_share(category_id).await)
    }

    /// Calls the backend for a share token, degrading to a locally generated
    /// one so the link can still be produced offline.
    async fn generate_category_share(&mut self, category_id: &str) -> ShareLink {
        let token = match self.gateway.generate_share_token(category_id).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("share token generation failed, using local token: {}", e);
                Uuid::new_v4().to_string()
            }
        };
        let link = self.push_link(token, ShareTarget::Category(category_id.to_string()));
        self.persist();
        link
    }

    fn push_link(&mut self, token: String, target: ShareTarget) -> ShareLink {
        let link = ShareLink {
            id: Uuid::new_v4().to_string(),
            token,
            target,
            created_at: Self::now(),
        };
        self.share_links.push(link.clone());
        link
    }

    /// Revokes a category's share token remotely and drops the local links
    /// pointing at it.
    pub async fn revoke_category_share(&mut self, category_id: &str) -> Result<(), StoreError> {
        if let Err(e) = self.gateway.revoke_share_token(category_id).await {
            tracing::warn!("remote share revocation failed, dropping local link: {}", e);
        }
        self.share_links
            .retain(|l| l.target != ShareTarget::Category(category_id.to_string()));
        self.persist();
        Ok(())
    }

    /// Resolves a share token to its content. Always lands on a terminal
    /// [`ShareResolution`]; transport and lookup problems surface as
    /// `NotFound` or `Failed`, never as an error.
    pub async fn resolve_share(&self, token: &str) -> ShareResolution {
        // Remote first: the server materializes member bookmarks itself, so
        // its payload is taken as-is with no further matching pass.
        match self.gateway.fetch_shared_category(token).await {
            Ok(shared) => {
                let bookmarks = shared
                    .bookmarks
                    .into_iter()
                    .map(|dto| {
                        let mut bookmark = dto.into_bookmark("");
                        bookmark.integrated = true;
                        bookmark
                    })
                    .collect();
                return ShareResolution::Category(SharedCategory {
                    id: shared.id,
                    title: shared.title,
                    tag_names: shared.tag_names,
                    bookmarks,
                });
            }
            Err(e) => {
                tracing::debug!("remote share lookup failed, trying local links: {}", e);
            }
        }

        let Some(link) = self.find_local_link(token) else {
            return ShareResolution::NotFound;
        };

        match link.target {
            ShareTarget::Bookmark(bookmark_id) => {
                match self.bookmarks.iter().find(|b| b.id == bookmark_id) {
                    Some(bookmark) => ShareResolution::Bookmark(bookmark.clone()),
                    None => ShareResolution::Failed("bookmark not found".to_string()),
                }
            }
            ShareTarget::Category(category_id) => {
                let Some(category) = self.categories.iter().find(|c| c.id == category_id)
                else {
                    return ShareResolution::Failed("category not found".to_string());
                };
                if !category.is_public {
                    return ShareResolution::Failed("category is private".to_string());
                }
                let bookmarks = membership::category_members(category, &self.bookmarks)
                    .into_iter()
                    .cloned()
                    .collect();
                ShareResolution::Category(SharedCategory {
                    id: category.id.clone(),
                    title: category.title.clone(),
                    tag_names: category.tags.iter().map(|t| t.name.clone()).collect(),
                    bookmarks,
                })
            }
        }
    }

    /// Looks a token up in the in-memory link collection, falling back to
    /// the persisted snapshot when the collection has not been populated
    /// yet (a link created before this process hydrated).
    fn find_local_link(&self, token: &str) -> Option<ShareLink> {
        if !self.share_links.is_empty() {
            return self.share_links.iter().find(|l| l.token == token).cloned();
        }
        let raw = self.storage.get(SNAPSHOT_KEY)?;
        let snapshot: Snapshot = serde_json::from_str(&raw).ok()?;
        snapshot
            .share_links
            .into_iter()
            .find(|l| l.token == token)
    }

    /// Clones a shared bookmark into the importing user's own collection.
    /// Fresh identity and timestamps; favorite state is not preserved; tags
    /// are re-created (or reused) under the importing user.
    pub async fn import_shared_bookmark(
        &mut self,
        shared: &Bookmark,
    ) -> Result<Bookmark, StoreError> {
        self.require_user()?;

        let mut tags = Vec::with_capacity(shared.tags.len());
        for tag in &shared.tags {
            tags.push(self.find_or_create_tag(&tag.name).await?);
        }

        self.add_bookmark(NewBookmark {
            title: shared.title.clone(),
            url: shared.url.clone(),
            description: shared.description.clone(),
            category_id: None,
            tags,
            integrated: false,
        })
        .await
    }

    /// Imports a shared category: one new private category, tags resolved
    /// through the dedup path, and every member bookmark cloned.
    ///
    /// The clone calls are dispatched concurrently and joined; individual
    /// failures are captured in the report (and logged) without aborting the
    /// import — the category that was already created stays.
    pub async fn import_shared_category(
        &mut self,
        shared: &SharedCategory,
    ) -> Result<ImportReport, StoreError> {
        let user = self.require_user()?;

        let mut tags = Vec::with_capacity(shared.tag_names.len());
        for name in &shared.tag_names {
            tags.push(self.find_or_create_tag(name).await?);
        }

        let category = self
            .add_category(NewCategory {
                title: shared.title.clone(),
                is_public: false,
                tags,
            })
            .await?;

        // Resolve every bookmark tag before fanning out, so the dedup pass
        // stays sequential while the network calls run concurrently.
        for bookmark in &shared.bookmarks {
            for tag in &bookmark.tags {
                self.find_or_create_tag(&tag.name).await?;
            }
        }

        let gateway = &self.gateway;
        let category_id = category.id.clone();
        let clone_calls = shared.bookmarks.iter().map(|bookmark| {
            let request = BookmarkRequest {
                title: bookmark.title.clone(),
                url: bookmark.url.clone(),
                description: bookmark.description.clone(),
                category_id: Some(category_id.clone()),
                tag_names: bookmark.tags.iter().map(|t| t.name.clone()).collect(),
            };
            let title = bookmark.title.clone();
            async move { (title, gateway.create_bookmark(&request).await) }
        });
        let results = join_all(clone_calls).await;

        let mut imported = Vec::new();
        let mut failed = Vec::new();
        for (title, result) in results {
            match result {
                Ok(dto) => {
                    let bookmark = dto.into_bookmark(&user.id);
                    self.bookmarks.push(bookmark.clone());
                    imported.push(bookmark);
                }
                Err(e) => {
                    tracing::warn!("bookmark clone {:?} failed during import: {}", title, e);
                    failed.push(ImportFailure {
                        title,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.persist();
        Ok(ImportReport {
            category_id: category.id,
            imported,
            failed,
        })
    }
}
