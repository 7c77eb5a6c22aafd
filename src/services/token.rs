//! Access-token inspection.
//!
//! The client never verifies signatures — that is the server's job. Tokens
//! are only decoded to recover the identity claim and bootstrap a session
//! from persisted storage.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::types::errors::TokenError;
use crate::types::user::User;

/// The claims the client cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decodes the payload segment of a JWT-shaped token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return Err(TokenError::Malformed),
    };
    if segments.next().is_some() {
        return Err(TokenError::Malformed);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| TokenError::Decode(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Decode(e.to_string()))
}

/// Rebuilds a provisional [`User`] from a persisted token.
///
/// The remembered login email takes precedence over token claims; the
/// username is the email's local part. Returns `None` when the token cannot
/// be decoded or carries no subject — the caller then stays logged out.
pub fn user_from_token(token: &str, email_hint: Option<&str>) -> Option<User> {
    let claims = decode_claims(token).ok()?;
    let id = claims.sub.clone()?;
    let email = email_hint
        .map(str::to_string)
        .or(claims.email)
        .or(claims.sub)
        .unwrap_or_default();
    let username = email.split('@').next().unwrap_or_default().to_string();
    Some(User {
        id,
        username,
        email,
    })
}
