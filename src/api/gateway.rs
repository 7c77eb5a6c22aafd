//! The remote bookmark-service surface consumed by the store.

use crate::types::errors::ApiError;

use super::dto::{
    BookmarkDto, BookmarkPatch, BookmarkRequest, CategoryDto, CategoryPatch, CategoryRequest,
    LoginDto, SharedCategoryDto, TagDto,
};

/// Trait defining the remote gateway operations.
///
/// The store is generic over this trait so tests can substitute an
/// in-memory backend. All methods suspend at the network boundary; none of
/// them mutate local state.
#[allow(async_fn_in_trait)]
pub trait RemoteGateway {
    // auth + account
    async fn login(&self, email: &str, password: &str) -> Result<LoginDto, ApiError>;
    async fn register(&self, email: &str, password: &str, nickname: &str)
        -> Result<(), ApiError>;
    async fn send_verification_code(&self, email: &str) -> Result<(), ApiError>;
    async fn verify_code(&self, email: &str, code: &str) -> Result<(), ApiError>;
    async fn delete_account(&self, password: &str) -> Result<(), ApiError>;

    // bookmarks
    async fn fetch_bookmarks(&self) -> Result<Vec<BookmarkDto>, ApiError>;
    async fn search_bookmarks(&self, keyword: &str) -> Result<Vec<BookmarkDto>, ApiError>;
    async fn fetch_favorite_bookmarks(&self) -> Result<Vec<BookmarkDto>, ApiError>;
    async fn create_bookmark(&self, req: &BookmarkRequest) -> Result<BookmarkDto, ApiError>;
    async fn update_bookmark(&self, id: &str, req: &BookmarkPatch)
        -> Result<BookmarkDto, ApiError>;
    async fn delete_bookmark(&self, id: &str) -> Result<(), ApiError>;
    async fn toggle_favorite(&self, id: &str) -> Result<(), ApiError>;

    // categories
    async fn fetch_categories(&self) -> Result<Vec<CategoryDto>, ApiError>;
    async fn create_category(&self, req: &CategoryRequest) -> Result<CategoryDto, ApiError>;
    async fn update_category(&self, id: &str, req: &CategoryPatch)
        -> Result<CategoryDto, ApiError>;
    async fn delete_category(&self, id: &str) -> Result<(), ApiError>;
    async fn toggle_category_visibility(&self, id: &str) -> Result<(), ApiError>;
    async fn fetch_category_bookmarks(&self, id: &str) -> Result<Vec<BookmarkDto>, ApiError>;
    async fn generate_share_token(&self, category_id: &str) -> Result<String, ApiError>;
    async fn fetch_shared_category(&self, token: &str) -> Result<SharedCategoryDto, ApiError>;
    async fn import_shared_category(&self, token: &str) -> Result<CategoryDto, ApiError>;
    async fn revoke_share_token(&self, category_id: &str) -> Result<(), ApiError>;

    // tags
    async fn fetch_tags(&self) -> Result<Vec<TagDto>, ApiError>;
    async fn create_tag(&self, name: &str) -> Result<TagDto, ApiError>;
    async fn update_tag(&self, id: &str, name: &str) -> Result<TagDto, ApiError>;
    async fn delete_tag(&self, id: &str) -> Result<(), ApiError>;
}
