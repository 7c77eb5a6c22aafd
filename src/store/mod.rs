//! Local cache store.
//!
//! Single source of truth for the client's domain entities. Every mutation
//! goes through the remote gateway first, then reconciles local state, then
//! writes the persisted snapshot. UI layers read through the per-user
//! projections and must treat every mutation as eventually-settling.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::api::gateway::RemoteGateway;
use crate::storage::{KeyValueStorage, SNAPSHOT_KEY};
use crate::types::bookmark::{Bookmark, RecentView};
use crate::types::category::Category;
use crate::types::errors::{ApiError, StoreError};
use crate::types::share::ShareLink;
use crate::types::tag::Tag;
use crate::types::user::User;

mod bookmarks;
mod categories;
mod recent;
mod session;
mod share;
mod tags;

pub use recent::record_view;

/// Upper bound on the recently-viewed list.
pub const MAX_RECENT_VIEWS: usize = 10;

/// How a write that fails remotely is reconciled locally.
///
/// This is a deliberate availability-over-consistency split: bookmark form
/// errors are surfaced to the user, while categories and tags degrade to a
/// local-only write so transient backend trouble never blocks organizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePolicy {
    /// The failure propagates to the caller; local state is untouched.
    Strict,
    /// The write is applied locally anyway; the backend catches up later.
    Optimistic,
}

/// Write policy for the bookmark entity family.
pub const BOOKMARK_WRITE_POLICY: WritePolicy = WritePolicy::Strict;
/// Write policy for the category entity family.
pub const CATEGORY_WRITE_POLICY: WritePolicy = WritePolicy::Optimistic;
/// Write policy for the tag entity family.
pub const TAG_WRITE_POLICY: WritePolicy = WritePolicy::Optimistic;

impl WritePolicy {
    /// Routes a failed remote write: strict failures propagate, optimistic
    /// ones are logged and absorbed so the local write can proceed.
    pub(crate) fn absorb(self, err: ApiError, entity: &str) -> Result<(), StoreError> {
        match self {
            WritePolicy::Strict => Err(StoreError::Remote(err)),
            WritePolicy::Optimistic => {
                tracing::warn!(
                    "remote {} write failed, keeping local state: {}",
                    entity,
                    err
                );
                Ok(())
            }
        }
    }
}

/// Serialized reflection of the whole store, written back after every state
/// transition and restored wholesale at process start.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub bookmarks: Vec<Bookmark>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub share_links: Vec<ShareLink>,
    pub recent_views: Vec<RecentView>,
    pub current_user: Option<User>,
}

/// The local cache store, generic over the remote gateway so tests can
/// substitute an in-memory backend.
pub struct Store<G> {
    gateway: G,
    storage: Arc<dyn KeyValueStorage>,
    bookmarks: Vec<Bookmark>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    share_links: Vec<ShareLink>,
    recent_views: Vec<RecentView>,
    current_user: Option<User>,
    hydrated: bool,
}

impl<G: RemoteGateway> Store<G> {
    /// Creates an empty, unhydrated store. Call [`Store::hydrate`] to restore
    /// the persisted snapshot and bootstrap the session.
    pub fn new(gateway: G, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            gateway,
            storage,
            bookmarks: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            share_links: Vec::new(),
            recent_views: Vec::new(),
            current_user: None,
            hydrated: false,
        }
    }

    /// Returns the current UNIX timestamp in seconds.
    pub(crate) fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Whether the persisted snapshot has finished restoring. Flips exactly
    /// once per process lifetime.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn share_links(&self) -> &[ShareLink] {
        &self.share_links
    }

    pub fn recent_views(&self) -> &[RecentView] {
        &self.recent_views
    }

    // === Per-user projections ===
    //
    // The collections are global to the process; UI reads go through these
    // filters and see only the current user's data. All of them return empty
    // when no session exists.

    pub fn user_bookmarks(&self) -> Vec<Bookmark> {
        let Some(user) = &self.current_user else {
            return Vec::new();
        };
        self.bookmarks
            .iter()
            .filter(|b| b.owner_id == user.id)
            .cloned()
            .collect()
    }

    pub fn user_categories(&self) -> Vec<Category> {
        let Some(user) = &self.current_user else {
            return Vec::new();
        };
        self.categories
            .iter()
            .filter(|c| c.owner_id == user.id)
            .cloned()
            .collect()
    }

    pub fn user_tags(&self) -> Vec<Tag> {
        let Some(user) = &self.current_user else {
            return Vec::new();
        };
        self.tags
            .iter()
            .filter(|t| t.owner_id == user.id)
            .cloned()
            .collect()
    }

    // === Internal helpers ===

    pub(crate) fn require_user(&self) -> Result<User, StoreError> {
        self.current_user.clone().ok_or(StoreError::NotLoggedIn)
    }

    /// Looks up a bookmark and checks ownership against the current user.
    pub(crate) fn owned_bookmark_index(
        &self,
        id: &str,
        user: &User,
    ) -> Result<usize, StoreError> {
        let index = self
            .bookmarks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if self.bookmarks[index].owner_id != user.id {
            return Err(StoreError::NotOwner(id.to_string()));
        }
        Ok(index)
    }

    /// Looks up a category and checks ownership against the current user.
    pub(crate) fn owned_category_index(
        &self,
        id: &str,
        user: &User,
    ) -> Result<usize, StoreError> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if self.categories[index].owner_id != user.id {
            return Err(StoreError::NotOwner(id.to_string()));
        }
        Ok(index)
    }

    /// Writes the serialized snapshot back to storage. Persistence never
    /// blocks a state transition; failures are logged.
    pub(crate) fn persist(&self) {
        let snapshot = Snapshot {
            bookmarks: self.bookmarks.clone(),
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            share_links: self.share_links.clone(),
            recent_views: self.recent_views.clone(),
            current_user: self.current_user.clone(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(json) => self.storage.set(SNAPSHOT_KEY, &json),
            Err(e) => tracing::warn!("snapshot serialization failed: {}", e),
        }
    }
}
