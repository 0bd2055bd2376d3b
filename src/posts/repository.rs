// Post cache-repository
//
// All post reads and writes go through here. The listing view is cached
// under one key; every write that can change it evicts that key.
//
// Store and cache writes are not transactional with each other: if the
// process dies between a store write and the eviction, the listing stays
// stale until its 10-minute expiry.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::CacheStore;
use crate::error::ApiError;
use crate::posts::models::{Post, PostInput};
use crate::posts::store::PostStore;

/// Cache key of the post listing
pub const POSTS_LISTING_KEY: &str = "posts-listing";

/// Lifetime of a cached listing
pub const LISTING_TTL: Duration = Duration::from_secs(10 * 60);

/// Mediates between callers, the authoritative store and the listing cache
#[derive(Clone)]
pub struct PostRepository {
    store: Arc<dyn PostStore>,
    cache: Arc<dyn CacheStore>,
}

impl PostRepository {
    /// Create a new PostRepository
    pub fn new(store: Arc<dyn PostStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self { store, cache }
    }

    /// Validate, trim and insert a post, then evict the listing
    pub async fn create(&self, author_id: Uuid, post: &PostInput) -> Result<Uuid, ApiError> {
        let prepared = post.prepare()?;

        let id = self.store.insert(author_id, &prepared).await?;
        self.invalidate_listing().await;

        tracing::info!("Created post {} by author {}", id, author_id);
        Ok(id)
    }

    /// Read one post straight from the store; never cached
    pub async fn get_by_id(&self, id: Uuid) -> Result<Post, ApiError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Post", id))
    }

    /// All posts, newest first, served from the cache when possible
    ///
    /// A miss (or an unreadable cached value) falls through to the store.
    /// Non-empty results are written back with a 10-minute expiry; failing
    /// to write them back is not an error.
    pub async fn list_all(&self) -> Result<Vec<Post>, ApiError> {
        match self.cache.get(POSTS_LISTING_KEY).await {
            Ok(Some(cached)) => match serde_json::from_str::<Vec<Post>>(&cached) {
                Ok(posts) => {
                    tracing::debug!("Post listing served from cache ({} posts)", posts.len());
                    return Ok(posts);
                }
                Err(e) => tracing::warn!("Discarding unreadable cached listing: {}", e),
            },
            Ok(None) => tracing::debug!("Post listing cache miss"),
            Err(e) => tracing::warn!("Cache read failed, falling back to store: {}", e),
        }

        let posts = self.store.find_all().await?;

        if !posts.is_empty() {
            self.populate_listing(&posts).await;
        }

        Ok(posts)
    }

    /// Overwrite title and content, then evict the listing
    pub async fn update(&self, id: Uuid, post: &PostInput) -> Result<(), ApiError> {
        let prepared = post.prepare()?;

        let affected = self.store.update(id, &prepared).await?;
        self.invalidate_listing().await;
        Self::require_row(affected, id)?;

        tracing::info!("Updated post {}", id);
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let affected = self.store.delete(id).await?;
        self.invalidate_listing().await;
        Self::require_row(affected, id)?;

        tracing::info!("Deleted post {}", id);
        Ok(())
    }

    pub async fn like(&self, id: Uuid) -> Result<(), ApiError> {
        let affected = self.store.increment_likes(id).await?;
        self.invalidate_listing().await;
        Self::require_row(affected, id)
    }

    /// Floor-clamped at zero by the store itself
    pub async fn dislike(&self, id: Uuid) -> Result<(), ApiError> {
        let affected = self.store.decrement_likes(id).await?;
        self.invalidate_listing().await;
        Self::require_row(affected, id)
    }

    fn require_row(affected: u64, id: Uuid) -> Result<(), ApiError> {
        if affected == 0 {
            return Err(ApiError::not_found("Post", id));
        }
        Ok(())
    }

    async fn populate_listing(&self, posts: &[Post]) {
        let serialized = match serde_json::to_string(posts) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!("Could not serialize post listing for cache: {}", e);
                return;
            }
        };

        if let Err(e) = self.cache.set(POSTS_LISTING_KEY, serialized, LISTING_TTL).await {
            tracing::warn!("Cache write failed, listing not cached: {}", e);
        }
    }

    async fn invalidate_listing(&self) {
        if let Err(e) = self.cache.delete(POSTS_LISTING_KEY).await {
            // Stale for at most LISTING_TTL
            tracing::warn!("Cache eviction of '{}' failed: {}", POSTS_LISTING_KEY, e);
        }
    }
}
