//! Session lifecycle: login, registration, logout, and the one-time
//! hydration bootstrap.

use crate::api::gateway::RemoteGateway;
use crate::services::token;
use crate::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SNAPSHOT_KEY, USER_EMAIL_KEY};
use crate::types::errors::StoreError;
use crate::types::user::User;

use super::{Snapshot, Store};

fn email_local_part(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

impl<G: RemoteGateway> Store<G> {
    /// Authenticates against the backend, persists the token pair, installs
    /// the session, and bulk-loads the user's collections.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, StoreError> {
        let response = self.gateway.login(email, password).await?;

        self.storage.set(ACCESS_TOKEN_KEY, &response.access_token);
        self.storage.set(REFRESH_TOKEN_KEY, &response.refresh_token);
        self.storage.set(USER_EMAIL_KEY, email);

        // Prefer the user object from the response; fall back to the token
        // claims. The login email always wins over whatever the server echoes.
        let user = match response.user {
            Some(dto) => User {
                id: dto.id,
                username: dto
                    .username
                    .unwrap_or_else(|| email_local_part(email)),
                email: email.to_string(),
            },
            None => token::user_from_token(&response.access_token, Some(email)).ok_or_else(
                || {
                    StoreError::Remote(crate::types::errors::ApiError::Decode(
                        "login response carried no user and an unreadable token".to_string(),
                    ))
                },
            )?,
        };

        tracing::debug!("logged in as {}", user.id);
        self.current_user = Some(user.clone());
        self.persist();
        self.reload_all().await;
        Ok(user)
    }

    /// Registers a new account, then logs in with the same credentials.
    ///
    /// A failed auto-login does not undo the successful registration; the
    /// caller can log in manually once the account is usable.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<(), StoreError> {
        self.gateway.register(email, password, username).await?;
        self.storage.set(USER_EMAIL_KEY, email);

        if let Err(e) = self.login(email, password).await {
            tracing::warn!("auto-login after registration failed: {}", e);
        }
        Ok(())
    }

    /// Ends the session: credentials removed, session cleared. Never fails.
    pub fn logout(&mut self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
        self.storage.remove(USER_EMAIL_KEY);
        self.current_user = None;
        self.persist();
    }

    /// Requests an email verification code.
    pub async fn resend_verification(&self, email: &str) -> Result<(), StoreError> {
        self.gateway.send_verification_code(email).await?;
        Ok(())
    }

    /// Submits an email verification code.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<(), StoreError> {
        self.gateway.verify_code(email, code).await?;
        Ok(())
    }

    /// Deletes the account on the backend, then tears the session down.
    pub async fn delete_account(&mut self, password: &str) -> Result<(), StoreError> {
        self.require_user()?;
        self.gateway.delete_account(password).await?;
        self.logout();
        Ok(())
    }

    /// Restores the persisted snapshot and bootstraps the session.
    ///
    /// Runs at most once per process: the `hydrated` flag flips here and only
    /// here. If a session was snapshotted, its collections are reloaded from
    /// the backend. Otherwise, a persisted credential is decoded into a
    /// provisional user and the same reload happens. With no usable
    /// credential the store stays logged out — no error is surfaced.
    pub async fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }

        if let Some(raw) = self.storage.get(SNAPSHOT_KEY) {
            match serde_json::from_str::<Snapshot>(&raw) {
                Ok(snapshot) => {
                    self.bookmarks = snapshot.bookmarks;
                    self.categories = snapshot.categories;
                    self.tags = snapshot.tags;
                    self.share_links = snapshot.share_links;
                    self.recent_views = snapshot.recent_views;
                    self.current_user = snapshot.current_user;
                }
                Err(e) => tracing::warn!("discarding unreadable snapshot: {}", e),
            }
        }
        self.hydrated = true;

        if self.current_user.is_some() {
            self.reload_all().await;
            return;
        }

        let Some(access_token) = self.storage.get(ACCESS_TOKEN_KEY) else {
            tracing::debug!("no persisted credential, staying logged out");
            return;
        };
        let email = self.storage.get(USER_EMAIL_KEY);
        match token::user_from_token(&access_token, email.as_deref()) {
            Some(user) => {
                tracing::debug!("session restored from persisted token for {}", user.id);
                self.current_user = Some(user);
                self.persist();
                self.reload_all().await;
            }
            None => {
                tracing::debug!("persisted token unreadable, staying logged out");
            }
        }
    }

    /// Bulk-loads bookmarks, categories, and tags after session
    /// establishment. Individual load failures are logged, not propagated —
    /// the snapshot copy keeps the UI usable.
    pub(crate) async fn reload_all(&mut self) {
        if let Err(e) = self.load_user_bookmarks().await {
            tracing::warn!("bookmark load failed: {}", e);
        }
        if let Err(e) = self.load_user_categories().await {
            tracing::warn!("category load failed: {}", e);
        }
        if let Err(e) = self.load_user_tags().await {
            tracing::warn!("tag load failed: {}", e);
        }
    }
}
