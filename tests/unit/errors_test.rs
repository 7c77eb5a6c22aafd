//! Unit tests for the error types' Display implementations and source
//! chaining.

use linkstash::types::errors::*;

// === ApiError Tests ===

#[test]
fn api_error_display_variants() {
    assert_eq!(
        ApiError::Network("connection refused".to_string()).to_string(),
        "Network error: connection refused"
    );
    assert_eq!(
        ApiError::Status(500, "boom".to_string()).to_string(),
        "Server returned 500: boom"
    );
    assert_eq!(ApiError::Unauthorized.to_string(), "Not authorized");
    assert_eq!(
        ApiError::Decode("expected value".to_string()).to_string(),
        "Response decode error: expected value"
    );
}

#[test]
fn api_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(ApiError::Unauthorized);
    assert!(err.source().is_none());
}

// === TokenError Tests ===

#[test]
fn token_error_display_variants() {
    assert_eq!(TokenError::Malformed.to_string(), "Malformed token");
    assert_eq!(
        TokenError::Decode("bad base64".to_string()).to_string(),
        "Token decode error: bad base64"
    );
}

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::Database("locked".to_string()).to_string(),
        "Storage database error: locked"
    );
    assert_eq!(
        StorageError::Serialization("eof".to_string()).to_string(),
        "Storage serialization error: eof"
    );
}

// === ConfigError Tests ===

#[test]
fn config_error_display_variants() {
    assert_eq!(
        ConfigError::Io("permission denied".to_string()).to_string(),
        "Config I/O error: permission denied"
    );
    assert_eq!(
        ConfigError::Serialization("trailing comma".to_string()).to_string(),
        "Config serialization error: trailing comma"
    );
}

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(StoreError::NotLoggedIn.to_string(), "Not logged in");
    assert_eq!(
        StoreError::NotFound("b-1".to_string()).to_string(),
        "Not found: b-1"
    );
    assert_eq!(
        StoreError::NotOwner("c-1".to_string()).to_string(),
        "Not the owner of: c-1"
    );
    assert_eq!(
        StoreError::Remote(ApiError::Unauthorized).to_string(),
        "Remote call failed: Not authorized"
    );
}

#[test]
fn store_error_remote_exposes_source() {
    let err = StoreError::Remote(ApiError::Status(404, "gone".to_string()));
    let source = std::error::Error::source(&err).expect("remote errors carry a source");
    assert_eq!(source.to_string(), "Server returned 404: gone");

    let err = StoreError::NotLoggedIn;
    assert!(std::error::Error::source(&err).is_none());
}

#[test]
fn store_error_from_api_error() {
    let err: StoreError = ApiError::Unauthorized.into();
    assert!(matches!(err, StoreError::Remote(ApiError::Unauthorized)));
}
