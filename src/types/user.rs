use serde::{Deserialize, Serialize};

/// An authenticated account as known to the client.
///
/// Identity is established at login, registration, or token restore and is
/// immutable for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}
