use uuid::Uuid;

use crate::auth::middleware::ensure_owner;
use crate::error::ApiError;
use crate::posts::{Post, PostInput, PostRepository};

/// Service layer for post business logic
///
/// Adds per-operation ownership checks on top of the cache-repository.
#[derive(Clone)]
pub struct PostService {
    repository: PostRepository,
}

impl PostService {
    /// Create a new PostService
    pub fn new(repository: PostRepository) -> Self {
        Self { repository }
    }

    /// Create a post authored by the caller
    pub async fn create_post(&self, caller_id: Uuid, input: PostInput) -> Result<Uuid, ApiError> {
        self.repository.create(caller_id, &input).await
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.repository.list_all().await
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post, ApiError> {
        self.repository.get_by_id(post_id).await
    }

    /// Update a post
    ///
    /// This method:
    /// 1. Fetches the existing post from the store
    /// 2. Verifies the caller authored it
    /// 3. Updates title and content
    pub async fn update_post(
        &self,
        post_id: Uuid,
        caller_id: Uuid,
        input: PostInput,
    ) -> Result<(), ApiError> {
        let existing = self.repository.get_by_id(post_id).await?;

        ensure_owner(
            caller_id,
            existing.author_id,
            "it is not possible to update a post that is not yours",
        )?;

        self.repository.update(post_id, &input).await
    }

    /// Delete a post the caller authored
    pub async fn delete_post(&self, post_id: Uuid, caller_id: Uuid) -> Result<(), ApiError> {
        let existing = self.repository.get_by_id(post_id).await?;

        ensure_owner(
            caller_id,
            existing.author_id,
            "it is not possible to delete a post that is not yours",
        )?;

        self.repository.delete(post_id).await
    }

    /// Any authenticated caller may like a post
    pub async fn like_post(&self, post_id: Uuid) -> Result<(), ApiError> {
        self.repository.like(post_id).await
    }

    pub async fn dislike_post(&self, post_id: Uuid) -> Result<(), ApiError> {
        self.repository.dislike(post_id).await
    }
}
