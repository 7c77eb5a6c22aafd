//! HTTP implementation of the remote gateway.
//!
//! Every authenticated call carries the bearer token from storage. A 401
//! triggers exactly one silent reissue-and-retry using the refresh token;
//! only when the reissue itself fails are both tokens cleared, terminating
//! the session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::storage::{KeyValueStorage, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::types::errors::ApiError;

use super::dto::{
    BookmarkDto, BookmarkPatch, BookmarkRequest, CategoryDto, CategoryPatch, CategoryRequest,
    LoginDto, LoginRequest, RegisterRequest, ReissueRequest, SharedCategoryDto, TagDto,
    TagRequest,
};
use super::gateway::RemoteGateway;

/// Gateway backed by `reqwest` against the bookmark service REST API.
pub struct HttpGateway {
    http: Client,
    base_url: String,
    storage: Arc<dyn KeyValueStorage>,
}

impl HttpGateway {
    /// Creates a gateway from the client configuration. Tokens are read from
    /// and written to the shared storage.
    pub fn new(config: &ClientConfig, storage: Arc<dyn KeyValueStorage>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request with the current bearer token attached. On a 401 the
    /// token pair is reissued once and the request is retried; any further
    /// 401 is surfaced as-is.
    async fn send(
        &self,
        build: impl Fn(&Client) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = self
            .authorized(build(&self.http))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check(response).await;
        }

        self.reissue().await?;
        let retried = self
            .authorized(build(&self.http))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(retried).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.storage.get(ACCESS_TOKEN_KEY) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Exchanges the refresh token for a new pair. Failure clears both
    /// tokens — the session is over.
    async fn reissue(&self) -> Result<(), ApiError> {
        let Some(refresh_token) = self.storage.get(REFRESH_TOKEN_KEY) else {
            self.clear_tokens();
            return Err(ApiError::Unauthorized);
        };

        let result = self
            .http
            .post(self.url("/auth/reissue"))
            .json(&ReissueRequest { refresh_token })
            .send()
            .await;

        let response = match result {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("token reissue rejected with {}", r.status());
                self.clear_tokens();
                return Err(ApiError::Unauthorized);
            }
            Err(e) => {
                self.clear_tokens();
                return Err(ApiError::Network(e.to_string()));
            }
        };

        let pair: super::dto::TokenPairDto = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.storage.set(ACCESS_TOKEN_KEY, &pair.access_token);
        self.storage.set(REFRESH_TOKEN_KEY, &pair.refresh_token);
        tracing::debug!("access token reissued");
        Ok(())
    }

    fn clear_tokens(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status(status.as_u16(), body))
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl RemoteGateway for HttpGateway {
    async fn login(&self, email: &str, password: &str) -> Result<LoginDto, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::json(Self::check(response).await?).await
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<(), ApiError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            nickname: nickname.to_string(),
        };
        let response = self
            .http
            .post(self.url("/users/register"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }

    async fn send_verification_code(&self, email: &str) -> Result<(), ApiError> {
        self.send(|http| {
            http.post(self.url("/email/send-code"))
                .query(&[("email", email)])
        })
        .await
        .map(|_| ())
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        self.send(|http| {
            http.post(self.url("/email/verify-code"))
                .query(&[("email", email), ("code", code)])
        })
        .await
        .map(|_| ())
    }

    async fn delete_account(&self, password: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "password": password });
        self.send(|http| http.post(self.url("/users/delete-account")).json(&body))
            .await
            .map(|_| ())
    }

    async fn fetch_bookmarks(&self) -> Result<Vec<BookmarkDto>, ApiError> {
        let response = self.send(|http| http.get(self.url("/api/bookmarks"))).await?;
        Self::json(response).await
    }

    async fn search_bookmarks(&self, keyword: &str) -> Result<Vec<BookmarkDto>, ApiError> {
        let response = self
            .send(|http| {
                http.get(self.url("/api/bookmarks/search"))
                    .query(&[("keyword", keyword)])
            })
            .await?;
        Self::json(response).await
    }

    async fn fetch_favorite_bookmarks(&self) -> Result<Vec<BookmarkDto>, ApiError> {
        let response = self
            .send(|http| http.get(self.url("/api/bookmarks/favorites")))
            .await?;
        Self::json(response).await
    }

    async fn create_bookmark(&self, req: &BookmarkRequest) -> Result<BookmarkDto, ApiError> {
        let response = self
            .send(|http| http.post(self.url("/api/bookmarks")).json(req))
            .await?;
        Self::json(response).await
    }

    async fn update_bookmark(
        &self,
        id: &str,
        req: &BookmarkPatch,
    ) -> Result<BookmarkDto, ApiError> {
        let response = self
            .send(|http| http.put(self.url(&format!("/api/bookmarks/{}", id))).json(req))
            .await?;
        Self::json(response).await
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), ApiError> {
        self.send(|http| http.delete(self.url(&format!("/api/bookmarks/{}", id))))
            .await
            .map(|_| ())
    }

    async fn toggle_favorite(&self, id: &str) -> Result<(), ApiError> {
        self.send(|http| http.patch(self.url(&format!("/api/bookmarks/{}/favorite", id))))
            .await
            .map(|_| ())
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryDto>, ApiError> {
        let response = self.send(|http| http.get(self.url("/api/categories"))).await?;
        Self::json(response).await
    }

    async fn create_category(&self, req: &CategoryRequest) -> Result<CategoryDto, ApiError> {
        let response = self
            .send(|http| http.post(self.url("/api/categories")).json(req))
            .await?;
        Self::json(response).await
    }

    async fn update_category(
        &self,
        id: &str,
        req: &CategoryPatch,
    ) -> Result<CategoryDto, ApiError> {
        let response = self
            .send(|http| http.put(self.url(&format!("/api/categories/{}", id))).json(req))
            .await?;
        Self::json(response).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.send(|http| http.delete(self.url(&format!("/api/categories/{}", id))))
            .await
            .map(|_| ())
    }

    async fn toggle_category_visibility(&self, id: &str) -> Result<(), ApiError> {
        self.send(|http| http.patch(self.url(&format!("/api/categories/{}/visibility", id))))
            .await
            .map(|_| ())
    }

    async fn fetch_category_bookmarks(&self, id: &str) -> Result<Vec<BookmarkDto>, ApiError> {
        let response = self
            .send(|http| http.get(self.url(&format!("/api/categories/{}/bookmarks", id))))
            .await?;
        Self::json(response).await
    }

    async fn generate_share_token(&self, category_id: &str) -> Result<String, ApiError> {
        let response = self
            .send(|http| http.post(self.url(&format!("/api/categories/{}/share-token", category_id))))
            .await?;
        // The server answers with the bare token, possibly JSON-quoted.
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(body.trim().trim_matches('"').to_string())
    }

    async fn fetch_shared_category(&self, token: &str) -> Result<SharedCategoryDto, ApiError> {
        let response = self
            .send(|http| http.get(self.url(&format!("/api/categories/share/{}", token))))
            .await?;
        Self::json(response).await
    }

    async fn import_shared_category(&self, token: &str) -> Result<CategoryDto, ApiError> {
        let response = self
            .send(|http| http.post(self.url(&format!("/api/categories/share/{}/import", token))))
            .await?;
        Self::json(response).await
    }

    async fn revoke_share_token(&self, category_id: &str) -> Result<(), ApiError> {
        self.send(|http| {
            http.delete(self.url(&format!("/api/categories/{}/share-token", category_id)))
        })
        .await
        .map(|_| ())
    }

    async fn fetch_tags(&self) -> Result<Vec<TagDto>, ApiError> {
        let response = self.send(|http| http.get(self.url("/api/tags"))).await?;
        Self::json(response).await
    }

    async fn create_tag(&self, name: &str) -> Result<TagDto, ApiError> {
        let body = TagRequest {
            name: name.to_string(),
        };
        let response = self
            .send(|http| http.post(self.url("/api/tags")).json(&body))
            .await?;
        Self::json(response).await
    }

    async fn update_tag(&self, id: &str, name: &str) -> Result<TagDto, ApiError> {
        let body = TagRequest {
            name: name.to_string(),
        };
        let response = self
            .send(|http| http.put(self.url(&format!("/api/tags/{}", id))).json(&body))
            .await?;
        Self::json(response).await
    }

    async fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        self.send(|http| http.delete(self.url(&format!("/api/tags/{}", id))))
            .await
            .map(|_| ())
    }
}
