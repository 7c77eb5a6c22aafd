//! Local persistent key-value storage.
//!
//! The client persists two kinds of data: the auth credentials (access and
//! refresh tokens plus the login email) and one serialized snapshot of the
//! whole store, written back after every state transition. Both go through
//! the same minimal get/set/remove capability.

use std::collections::HashMap;
use std::sync::Mutex;

pub mod sqlite;

pub use sqlite::SqliteStorage;

/// Storage key for the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key for the refresh token used by the one-shot reissue path.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key for the email the user last logged in with.
pub const USER_EMAIL_KEY: &str = "userEmail";
/// Fixed storage name of the serialized store snapshot.
pub const SNAPSHOT_KEY: &str = "linkstash-storage";

/// Minimal persistent key-value capability.
///
/// Implementations absorb their own write failures (logging them) so that
/// persistence never blocks a state transition.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage. Nothing survives the process; useful for tests and
/// ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
