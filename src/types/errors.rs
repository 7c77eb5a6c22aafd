use std::fmt;

// === ApiError ===

/// Errors produced at the remote gateway boundary.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    Network(String),
    /// The server answered with a non-success status.
    Status(u16, String),
    /// The credential was rejected and could not be reissued.
    Unauthorized,
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Status(code, body) => write!(f, "Server returned {}: {}", code, body),
            ApiError::Unauthorized => write!(f, "Not authorized"),
            ApiError::Decode(msg) => write!(f, "Response decode error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// === TokenError ===

/// Errors related to access-token inspection.
#[derive(Debug, Clone)]
pub enum TokenError {
    /// The token does not have the three-segment layout.
    Malformed,
    /// The payload segment could not be decoded or parsed.
    Decode(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "Malformed token"),
            TokenError::Decode(msg) => write!(f, "Token decode error: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

// === StorageError ===

/// Errors related to the local key-value storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    Database(String),
    /// Failed to serialize or deserialize stored data.
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Database(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

// === ConfigError ===

/// Errors related to client configuration files.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading or writing the config file.
    Io(String),
    /// Failed to serialize or deserialize the configuration.
    Serialization(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::Serialization(msg) => {
                write!(f, "Config serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// === StoreError ===

/// Errors surfaced by the local cache store.
#[derive(Debug)]
pub enum StoreError {
    /// The operation requires an authenticated session.
    NotLoggedIn,
    /// No entity with the given id exists locally.
    NotFound(String),
    /// The acting user does not own the entity.
    NotOwner(String),
    /// The remote write failed and the entity's policy does not allow a
    /// local-only fallback.
    Remote(ApiError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotLoggedIn => write!(f, "Not logged in"),
            StoreError::NotFound(id) => write!(f, "Not found: {}", id),
            StoreError::NotOwner(id) => write!(f, "Not the owner of: {}", id),
            StoreError::Remote(err) => write!(f, "Remote call failed: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        StoreError::Remote(err)
    }
}
