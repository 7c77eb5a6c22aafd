//! Recently-viewed bookmarks.
//!
//! A bounded MRU list: most-recent first, unique by bookmark id, never more
//! than [`MAX_RECENT_VIEWS`](super::MAX_RECENT_VIEWS) entries.

use uuid::Uuid;

use crate::api::gateway::RemoteGateway;
use crate::types::bookmark::RecentView;

use super::{Store, MAX_RECENT_VIEWS};

/// Moves (or inserts) the entry for `bookmark_id` to the front and trims the
/// list to its bound. Re-viewing keeps the entry's original id.
pub fn record_view(views: &mut Vec<RecentView>, bookmark_id: &str, now: i64) {
    match views.iter().position(|rv| rv.bookmark_id == bookmark_id) {
        Some(position) => {
            let mut existing = views.remove(position);
            existing.viewed_at = now;
            views.insert(0, existing);
        }
        None => {
            views.insert(
                0,
                RecentView {
                    id: Uuid::new_v4().to_string(),
                    bookmark_id: bookmark_id.to_string(),
                    viewed_at: now,
                },
            );
        }
    }
    views.truncate(MAX_RECENT_VIEWS);
}

impl<G: RemoteGateway> Store<G> {
    /// Records that a bookmark was viewed and persists the snapshot.
    pub fn add_recent_view(&mut self, bookmark_id: &str) {
        self.record_recent_view(bookmark_id);
        self.persist();
    }

    /// Same as [`Store::add_recent_view`] but leaves persistence to the
    /// caller; used inside larger transitions.
    pub(crate) fn record_recent_view(&mut self, bookmark_id: &str) {
        record_view(&mut self.recent_views, bookmark_id, Self::now());
    }

    /// The current user's recent views: entries whose bookmark still exists
    /// and belongs to them. Empty when logged out.
    pub fn user_recent_views(&self) -> Vec<RecentView> {
        let Some(user) = self.current_user() else {
            return Vec::new();
        };
        let owned: std::collections::HashSet<&str> = self
            .bookmarks()
            .iter()
            .filter(|b| b.owner_id == user.id)
            .map(|b| b.id.as_str())
            .collect();
        self.recent_views()
            .iter()
            .filter(|rv| owned.contains(rv.bookmark_id.as_str()))
            .cloned()
            .collect()
    }
}
