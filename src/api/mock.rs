//! In-memory gateway used by store tests.
//!
//! Backs every endpoint with a shared [`MockState`] so tests can seed
//! server-side data, flip failure switches, and inspect the requests the
//! store issued.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::types::errors::ApiError;

use super::dto::{
    BookmarkDto, BookmarkPatch, BookmarkRequest, CategoryDto, CategoryPatch, CategoryRequest,
    LoginDto, SharedCategoryDto, TagDto, TagRef, UserDto,
};
use super::gateway::RemoteGateway;

#[derive(Default)]
pub(crate) struct MockState {
    // server-side collections served by the fetch endpoints
    pub bookmarks: Vec<BookmarkDto>,
    pub categories: Vec<CategoryDto>,
    pub tags: Vec<TagDto>,
    pub search_results: Vec<BookmarkDto>,
    pub shared_token: Option<String>,
    pub shared_category: Option<SharedCategoryDto>,
    // failure switches
    pub fail_bookmark_writes: bool,
    pub fail_category_writes: bool,
    pub fail_tag_writes: bool,
    pub fail_share_token: bool,
    pub fail_fetches: bool,
    // call records
    pub created_bookmarks: Vec<BookmarkRequest>,
    pub created_categories: Vec<CategoryRequest>,
    pub created_tags: Vec<String>,
    pub deleted_bookmarks: Vec<String>,
    pub deleted_categories: Vec<String>,
    pub deleted_tags: Vec<String>,
    pub favorite_toggles: Vec<String>,
    pub share_tokens_issued: u32,
    pub revoked_share_tokens: Vec<String>,
    pub login_user: Option<UserDto>,
    pub suppress_login_user: bool,
    pub access_token: Option<String>,
}

pub(crate) struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// Returns the gateway plus a handle to its state for seeding and
    /// inspection.
    pub fn new() -> (Self, Arc<Mutex<MockState>>) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }

    fn echo_tags(names: &[String]) -> Vec<TagRef> {
        names
            .iter()
            .map(|n| TagRef::Full {
                id: format!("t-{}", n.to_lowercase()),
                name: n.clone(),
            })
            .collect()
    }

    fn write_error() -> ApiError {
        ApiError::Status(500, "mock write failure".to_string())
    }
}

impl RemoteGateway for MockGateway {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginDto, ApiError> {
        let state = self.state.lock().unwrap();
        Ok(LoginDto {
            access_token: state
                .access_token
                .clone()
                .unwrap_or_else(|| "mock-access".to_string()),
            refresh_token: "mock-refresh".to_string(),
            user: if state.suppress_login_user {
                None
            } else {
                state.login_user.clone().or_else(|| {
                    Some(UserDto {
                        id: "u1".to_string(),
                        username: None,
                        email: Some(email.to_string()),
                    })
                })
            },
        })
    }

    async fn register(
        &self,
        _email: &str,
        _password: &str,
        _nickname: &str,
    ) -> Result<(), ApiError> {
        Ok(())
    }

    async fn send_verification_code(&self, _email: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn verify_code(&self, _email: &str, _code: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete_account(&self, _password: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn fetch_bookmarks(&self) -> Result<Vec<BookmarkDto>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_fetches {
            return Err(ApiError::Network("mock fetch failure".to_string()));
        }
        Ok(state.bookmarks.clone())
    }

    async fn search_bookmarks(&self, _keyword: &str) -> Result<Vec<BookmarkDto>, ApiError> {
        Ok(self.state.lock().unwrap().search_results.clone())
    }

    async fn fetch_favorite_bookmarks(&self) -> Result<Vec<BookmarkDto>, ApiError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookmarks
            .iter()
            .filter(|b| b.is_favorite)
            .cloned()
            .collect())
    }

    async fn create_bookmark(&self, req: &BookmarkRequest) -> Result<BookmarkDto, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_bookmark_writes {
            return Err(Self::write_error());
        }
        state.created_bookmarks.push(req.clone());
        Ok(BookmarkDto {
            id: format!("b-{}", Uuid::new_v4()),
            title: req.title.clone(),
            url: req.url.clone(),
            description: req.description.clone(),
            category_id: req.category_id.clone(),
            tags: Some(Self::echo_tags(&req.tag_names)),
            tag_names: None,
            is_favorite: false,
            created_at: 1_000,
            updated_at: 1_000,
        })
    }

    async fn update_bookmark(
        &self,
        id: &str,
        req: &BookmarkPatch,
    ) -> Result<BookmarkDto, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_bookmark_writes {
            return Err(Self::write_error());
        }
        Ok(BookmarkDto {
            id: id.to_string(),
            title: req.title.clone().unwrap_or_default(),
            url: req.url.clone().unwrap_or_default(),
            description: req.description.clone(),
            category_id: req.category_id.clone().flatten(),
            tags: req.tag_names.as_deref().map(Self::echo_tags),
            tag_names: None,
            is_favorite: false,
            created_at: 1_000,
            updated_at: 2_000,
        })
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_bookmark_writes {
            return Err(Self::write_error());
        }
        state.deleted_bookmarks.push(id.to_string());
        Ok(())
    }

    async fn toggle_favorite(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_bookmark_writes {
            return Err(Self::write_error());
        }
        state.favorite_toggles.push(id.to_string());
        Ok(())
    }

    async fn fetch_categories(&self) -> Result<Vec<CategoryDto>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_fetches {
            return Err(ApiError::Network("mock fetch failure".to_string()));
        }
        Ok(state.categories.clone())
    }

    async fn create_category(&self, req: &CategoryRequest) -> Result<CategoryDto, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_category_writes {
            return Err(Self::write_error());
        }
        state.created_categories.push(req.clone());
        Ok(CategoryDto {
            id: format!("c-{}", Uuid::new_v4()),
            title: req.title.clone(),
            is_public: req.is_public,
            tags: Some(Self::echo_tags(&req.tag_names)),
            tag_names: None,
            created_at: 1_000,
            updated_at: 1_000,
        })
    }

    async fn update_category(
        &self,
        id: &str,
        req: &CategoryPatch,
    ) -> Result<CategoryDto, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_category_writes {
            return Err(Self::write_error());
        }
        Ok(CategoryDto {
            id: id.to_string(),
            title: req.title.clone().unwrap_or_default(),
            is_public: req.is_public.unwrap_or(false),
            tags: req.tag_names.as_deref().map(Self::echo_tags),
            tag_names: None,
            created_at: 1_000,
            updated_at: 2_000,
        })
    }

    async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_category_writes {
            return Err(Self::write_error());
        }
        state.deleted_categories.push(id.to_string());
        Ok(())
    }

    async fn toggle_category_visibility(&self, _id: &str) -> Result<(), ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_category_writes {
            return Err(Self::write_error());
        }
        Ok(())
    }

    async fn fetch_category_bookmarks(&self, id: &str) -> Result<Vec<BookmarkDto>, ApiError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bookmarks
            .iter()
            .filter(|b| b.category_id.as_deref() == Some(id))
            .cloned()
            .collect())
    }

    async fn generate_share_token(&self, category_id: &str) -> Result<String, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_share_token {
            return Err(Self::write_error());
        }
        state.share_tokens_issued += 1;
        Ok(format!("srv-{}-{}", category_id, state.share_tokens_issued))
    }

    async fn fetch_shared_category(&self, token: &str) -> Result<SharedCategoryDto, ApiError> {
        let state = self.state.lock().unwrap();
        match (&state.shared_token, &state.shared_category) {
            (Some(known), Some(shared)) if known == token => Ok(shared.clone()),
            _ => Err(ApiError::Status(404, "unknown share token".to_string())),
        }
    }

    async fn import_shared_category(&self, _token: &str) -> Result<CategoryDto, ApiError> {
        Err(ApiError::Status(404, "not supported by mock".to_string()))
    }

    async fn revoke_share_token(&self, category_id: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.revoked_share_tokens.push(category_id.to_string());
        Ok(())
    }

    async fn fetch_tags(&self) -> Result<Vec<TagDto>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_fetches {
            return Err(ApiError::Network("mock fetch failure".to_string()));
        }
        Ok(state.tags.clone())
    }

    async fn create_tag(&self, name: &str) -> Result<TagDto, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_tag_writes {
            return Err(Self::write_error());
        }
        state.created_tags.push(name.to_string());
        Ok(TagDto {
            id: format!("t-{}", name.to_lowercase()),
            name: name.to_string(),
        })
    }

    async fn update_tag(&self, id: &str, name: &str) -> Result<TagDto, ApiError> {
        let state = self.state.lock().unwrap();
        if state.fail_tag_writes {
            return Err(Self::write_error());
        }
        Ok(TagDto {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    async fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_tag_writes {
            return Err(Self::write_error());
        }
        state.deleted_tags.push(id.to_string());
        Ok(())
    }
}
